//! Agent transport, shared HTTP client construction and CLI error types.

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use goloba_config::{ConfigError, CtlConfig};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use thiserror::Error;
use url::Url;

use crate::dispatch::Dispatcher;
use crate::output::{ReportSink, error_chain};
use crate::request::Target;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

type BoxError = Box<dyn StdError + Send + Sync>;

/// CLI-level error type separating configuration problems from other
/// operational failures. Per-agent failures never surface here.
#[derive(Debug)]
pub(crate) enum CliError {
    Config(ConfigError),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 1,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Config(error) => format!("failed to load config: {}", error_chain(error)),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl StdError for CliError {}

/// Status and full body of one agent response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AgentResponse {
    pub(crate) status: u16,
    pub(crate) body: Vec<u8>,
}

impl AgentResponse {
    pub(crate) const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level failure talking to one agent.
#[derive(Debug, Error)]
pub(crate) enum TransportError {
    #[error("failed to send request")]
    Send { source: BoxError },
    #[error("failed to read response")]
    Read { source: BoxError },
}

/// Issues a single GET against an agent and returns the complete response.
#[async_trait]
pub(crate) trait AgentTransport: Send + Sync {
    async fn fetch(&self, url: Url) -> Result<AgentResponse, TransportError>;
}

/// `reqwest`-backed transport sharing one connection pool across all agents.
#[derive(Clone)]
pub(crate) struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build the shared client. `trace_id` is sent as `x-request-id` on every
    /// request of this invocation.
    pub(crate) fn new(timeout: Option<Duration>, trace_id: &str) -> CliResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
            CliError::failure(anyhow!("trace identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let mut builder = Client::builder().default_headers(default_headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl AgentTransport for HttpTransport {
    async fn fetch(&self, url: Url) -> Result<AgentResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| TransportError::Send {
                source: Box::new(err),
            })?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| TransportError::Read {
                source: Box::new(err),
            })?;
        Ok(AgentResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) dispatcher: Dispatcher,
    pub(crate) targets: Vec<Target>,
}

impl AppContext {
    /// Wire the HTTP transport and sinks for one invocation.
    pub(crate) fn from_config(
        config: &CtlConfig,
        trace_id: &str,
        report: Arc<ReportSink>,
        diagnostics: Arc<ReportSink>,
    ) -> CliResult<Self> {
        let transport = HttpTransport::new(config.timeout, trace_id)?;
        Ok(Self {
            dispatcher: Dispatcher::new(Arc::new(transport), report, diagnostics),
            targets: config.api_servers.iter().map(Target::from).collect(),
        })
    }
}
