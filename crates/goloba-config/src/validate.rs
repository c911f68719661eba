//! Field-level validation helpers.

use url::Url;

use crate::error::{ConfigError, ConfigResult};

pub(crate) fn validate_api_server_url(index: usize, raw: &str) -> ConfigResult<()> {
    let invalid = |reason| ConfigError::InvalidUrl {
        index,
        value: raw.to_string(),
        reason,
    };

    if raw.trim().is_empty() {
        return Err(invalid("url must not be empty"));
    }
    let parsed = Url::parse(raw).map_err(|_| invalid("not an absolute url"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("url has no host"));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("url must not carry a query or fragment"));
    }
    Ok(())
}
