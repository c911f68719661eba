//! Error types for configuration loading.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failures raised while loading client configuration. All of them are fatal:
/// no agent is contacted when configuration cannot be established.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}", path.display())]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration document was not valid YAML for the expected shape.
    #[error("failed to parse config file {}", describe_origin(origin.as_deref()))]
    Parse {
        /// File the document came from, when loaded from disk.
        origin: Option<PathBuf>,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
    /// An `api_servers` entry did not hold a usable base URL.
    #[error("invalid api server url '{value}' (entry {index}): {reason}")]
    InvalidUrl {
        /// Position of the entry in `api_servers`.
        index: usize,
        /// Offending value.
        value: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// The `timeout` value could not be interpreted as a duration.
    #[error("invalid timeout '{value}': {reason}")]
    InvalidTimeout {
        /// Offending value.
        value: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
}

fn describe_origin(origin: Option<&Path>) -> String {
    origin.map_or_else(|| String::from("<inline>"), |path| path.display().to_string())
}
