//! Validated configuration model.

use std::time::Duration;

/// Client configuration resolved from the YAML file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtlConfig {
    /// Per-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Agents addressed by every command, in configuration order.
    pub api_servers: Vec<ApiServer>,
}

/// One agent control endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiServer {
    /// Base URL exactly as configured; also used as the report label.
    pub url: String,
}
