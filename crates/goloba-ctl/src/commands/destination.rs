//! Attach, detach and unlock handlers.

use crate::cli::{DestinationArgs, UnlockArgs};
use crate::client::AppContext;
use crate::decode::Presentation;
use crate::dispatch::DispatchSummary;
use crate::request::{CommandSpec, DestinationRef};

pub(crate) async fn handle_attach(ctx: &AppContext, args: DestinationArgs) -> DispatchSummary {
    let spec = CommandSpec::attach(&args.destination(), args.lock);
    fan_out(ctx, &spec, Presentation::Labeled).await
}

pub(crate) async fn handle_detach(ctx: &AppContext, args: DestinationArgs) -> DispatchSummary {
    let spec = CommandSpec::detach(&args.destination(), args.lock);
    fan_out(ctx, &spec, Presentation::Labeled).await
}

pub(crate) async fn handle_unlock(ctx: &AppContext, args: UnlockArgs) -> DispatchSummary {
    let destination = DestinationRef {
        service: args.service,
        dest: args.dest,
    };
    fan_out(ctx, &CommandSpec::unlock(&destination), Presentation::Verbatim).await
}

async fn fan_out(
    ctx: &AppContext,
    spec: &CommandSpec,
    presentation: Presentation,
) -> DispatchSummary {
    let outcomes = ctx.dispatcher.dispatch(&ctx.targets, spec, presentation).await;
    DispatchSummary::from_outcomes(&outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{HEADER_REQUEST_ID, HttpTransport};
    use crate::dispatch::Dispatcher;
    use crate::output::ReportSink;
    use crate::request::Target;
    use crate::test_support::SharedBuffer;
    use anyhow::{Result, anyhow};
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use std::sync::Arc;

    fn context_with(server: &MockServer) -> Result<(AppContext, SharedBuffer)> {
        let report = SharedBuffer::default();
        let transport = HttpTransport::new(None, "destination-test")
            .map_err(|err| anyhow!(err.display_message()))?;
        let ctx = AppContext {
            dispatcher: Dispatcher::new(
                Arc::new(transport),
                Arc::new(ReportSink::new(report.clone())),
                Arc::new(ReportSink::new(SharedBuffer::default())),
            ),
            targets: vec![Target::new(server.base_url())],
        };
        Ok((ctx, report))
    }

    fn args(lock: bool) -> DestinationArgs {
        DestinationArgs {
            service: "192.168.122.2:80".to_string(),
            dest: "192.168.122.62:80".to_string(),
            lock,
        }
    }

    #[tokio::test]
    async fn attach_sends_lock_and_labels_response() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/attach")
                .query_param("service", "192.168.122.2:80")
                .query_param("dest", "192.168.122.62:80")
                .query_param("lock", "true")
                .header(HEADER_REQUEST_ID, "destination-test");
            then.status(200).body(r#"{"result":"ok"}"#);
        });

        let (ctx, report) = context_with(&server)?;
        let summary = handle_attach(&ctx, args(true)).await;

        mock.assert();
        assert_eq!(summary.succeeded, 1);
        assert_eq!(
            report.contents(),
            format!("{}:\n{{\"result\":\"ok\"}}\n", server.base_url())
        );
        Ok(())
    }

    #[tokio::test]
    async fn detach_forwards_explicit_unlock_flag() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/detach")
                .query_param("lock", "false");
            then.status(200).body("detached");
        });

        let (ctx, _) = context_with(&server)?;
        handle_detach(&ctx, args(false)).await;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn unlock_streams_body_without_label() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/unlock")
                .query_param("service", "192.168.122.2:80")
                .query_param("dest", "192.168.122.62:80");
            then.status(500).body("unlock failed\n");
        });

        let (ctx, report) = context_with(&server)?;
        let summary = handle_unlock(
            &ctx,
            UnlockArgs {
                service: "192.168.122.2:80".to_string(),
                dest: "192.168.122.62:80".to_string(),
            },
        )
        .await;

        mock.assert();
        assert_eq!(summary.succeeded, 1);
        assert_eq!(report.contents(), "unlock failed\n");
        Ok(())
    }
}
