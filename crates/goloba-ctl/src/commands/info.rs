use crate::cli::{InfoArgs, InfoFormat};
use crate::client::AppContext;
use crate::decode::Presentation;
use crate::dispatch::DispatchSummary;
use crate::request::CommandSpec;

pub(crate) async fn handle_info(ctx: &AppContext, args: InfoArgs) -> DispatchSummary {
    let presentation = match args.format {
        InfoFormat::Text => Presentation::StatusTable,
        InfoFormat::Json => Presentation::Labeled,
    };
    let outcomes = ctx
        .dispatcher
        .dispatch(&ctx.targets, &CommandSpec::info(), presentation)
        .await;
    DispatchSummary::from_outcomes(&outcomes)
}
