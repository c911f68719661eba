//! YAML ingestion for the client configuration file.
//!
//! The file looks like:
//!
//! ```yaml
//! timeout: 5s
//! api_servers:
//!   - url: http://lb01.example.com:8880
//!   - url: http://lb02.example.com:8880
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::duration::parse_duration;
use crate::error::{ConfigError, ConfigResult};
use crate::model::{ApiServer, CtlConfig};
use crate::validate::validate_api_server_url;

/// Location consulted when no `--config` flag is given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/goloba/golobactl.yml";

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    timeout: Option<RawTimeout>,
    #[serde(default)]
    api_servers: Vec<RawApiServer>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimeout {
    Nanos(u64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawApiServer {
    url: String,
}

/// Read, parse and validate the configuration file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] when the file cannot be read, and the errors
/// of [`from_yaml_str`] for its contents.
pub fn load(path: &Path) -> ConfigResult<CtlConfig> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse(&text, Some(path))?;
    debug!(
        path = %path.display(),
        api_servers = config.api_servers.len(),
        "loaded configuration"
    );
    Ok(config)
}

/// Parse and validate a configuration document held in memory.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed YAML, [`ConfigError::InvalidTimeout`]
/// for an unreadable timeout and [`ConfigError::InvalidUrl`] for unusable
/// agent URLs.
pub fn from_yaml_str(text: &str) -> ConfigResult<CtlConfig> {
    parse(text, None)
}

fn parse(text: &str, origin: Option<&Path>) -> ConfigResult<CtlConfig> {
    // An empty document is a valid, empty configuration.
    let raw: RawConfig = if text.trim().is_empty() {
        RawConfig {
            timeout: None,
            api_servers: Vec::new(),
        }
    } else {
        serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            origin: origin.map(Path::to_path_buf),
            source,
        })?
    };

    let timeout = match raw.timeout {
        None => None,
        Some(RawTimeout::Nanos(nanos)) => Some(Duration::from_nanos(nanos)),
        Some(RawTimeout::Text(value)) => Some(parse_duration(&value).map_err(|reason| {
            ConfigError::InvalidTimeout {
                value: value.clone(),
                reason,
            }
        })?),
    }
    .filter(|timeout| !timeout.is_zero());

    let api_servers = raw
        .api_servers
        .into_iter()
        .enumerate()
        .map(|(index, server)| {
            validate_api_server_url(index, &server.url)?;
            Ok(ApiServer { url: server.url })
        })
        .collect::<ConfigResult<Vec<_>>>()?;

    Ok(CtlConfig {
        timeout,
        api_servers,
    })
}
