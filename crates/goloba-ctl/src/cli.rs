//! Argument parsing, bootstrap and command dispatch for `golobactl`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use goloba_config::DEFAULT_CONFIG_PATH;
use goloba_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::destination::{handle_attach, handle_detach, handle_unlock};
use crate::commands::info::handle_info;
use crate::dispatch::DispatchSummary;
use crate::output::ReportSink;
use crate::request::DestinationRef;

/// Parses CLI arguments, fans the requested command out to every configured
/// agent and returns the process exit code.
///
/// Failures of individual agents are reported on stderr and do not change the
/// exit code; only configuration and client setup errors do.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    execute(
        cli,
        Arc::new(ReportSink::stdout()),
        Arc::new(ReportSink::stderr()),
    )
    .await
}

async fn execute(cli: Cli, report: Arc<ReportSink>, diagnostics: Arc<ReportSink>) -> i32 {
    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format,
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err}");
    }

    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();

    match dispatch(cli, &trace_id, report, diagnostics).await {
        Ok(summary) => {
            if summary.failed.is_empty() {
                debug!(
                    command = command_name,
                    trace_id = %trace_id,
                    succeeded = summary.succeeded,
                    "command complete"
                );
            } else {
                info!(
                    command = command_name,
                    trace_id = %trace_id,
                    succeeded = summary.succeeded,
                    failed = ?summary.failed,
                    "command complete with failed agents"
                );
            }
            0
        }
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(
    cli: Cli,
    trace_id: &str,
    report: Arc<ReportSink>,
    diagnostics: Arc<ReportSink>,
) -> CliResult<DispatchSummary> {
    let config = goloba_config::load(&cli.config).map_err(CliError::Config)?;
    if config.api_servers.is_empty() {
        warn!(config = %cli.config.display(), "no api_servers configured; nothing to do");
    }
    let ctx = AppContext::from_config(&config, trace_id, report, diagnostics)?;

    let summary = match cli.command {
        Command::Info(args) => handle_info(&ctx, args).await,
        Command::Attach(args) => handle_attach(&ctx, args).await,
        Command::Detach(args) => handle_detach(&ctx, args).await,
        Command::Unlock(args) => handle_unlock(&ctx, args).await,
    };
    Ok(summary)
}

#[derive(Parser)]
#[command(
    name = "golobactl",
    about = "Administrative client for goloba load-balancer agents"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "GOLOBACTL_CONFIG",
        default_value = DEFAULT_CONFIG_PATH,
        help = "Config file listing the agent API servers"
    )]
    config: PathBuf,
    #[arg(
        long,
        global = true,
        env = "GOLOBACTL_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL,
        help = "Diagnostic log level or filter (RUST_LOG takes precedence)"
    )]
    log_level: String,
    #[arg(
        long,
        global = true,
        env = "GOLOBACTL_LOG_FORMAT",
        default_value_t = LogFormat::Pretty,
        help = "Diagnostic log format: pretty or json"
    )]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show services and destinations of every agent.
    Info(InfoArgs),
    /// Manually attach a destination.
    Attach(DestinationArgs),
    /// Manually detach a destination.
    Detach(DestinationArgs),
    /// Release the lock on a destination so health checks apply again.
    Unlock(UnlockArgs),
}

#[derive(Args)]
pub(crate) struct InfoArgs {
    #[arg(long, value_enum, default_value_t = InfoFormat::Text, help = "Result format")]
    pub(crate) format: InfoFormat,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum InfoFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub(crate) struct DestinationArgs {
    #[arg(
        short = 's',
        long = "service",
        default_value = "",
        help = "Service address in <IPAddress>:<port> form"
    )]
    pub(crate) service: String,
    #[arg(
        short = 'd',
        long = "dest",
        default_value = "",
        help = "Destination address in <IPAddress>:<port> form"
    )]
    pub(crate) dest: String,
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
        help = "Keep the new state regardless of future health check results"
    )]
    pub(crate) lock: bool,
}

impl DestinationArgs {
    pub(crate) fn destination(&self) -> DestinationRef {
        DestinationRef {
            service: self.service.clone(),
            dest: self.dest.clone(),
        }
    }
}

#[derive(Args)]
pub(crate) struct UnlockArgs {
    #[arg(
        short = 's',
        long = "service",
        default_value = "",
        help = "Service address in <IPAddress>:<port> form"
    )]
    pub(crate) service: String,
    #[arg(
        short = 'd',
        long = "dest",
        default_value = "",
        help = "Destination address in <IPAddress>:<port> form"
    )]
    pub(crate) dest: String,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Info(_) => "info",
        Command::Attach(_) => "attach",
        Command::Detach(_) => "detach",
        Command::Unlock(_) => "unlock",
    }
}
