//! Targets and the per-command request descriptor shared by every target.

use std::fmt::{self, Display, Formatter};

use goloba_api_models::{params, paths};
use goloba_config::ApiServer;
use url::Url;

/// One agent control endpoint, labelled by its configured base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Target {
    label: String,
}

impl Target {
    pub(crate) fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }
}

impl From<&ApiServer> for Target {
    fn from(server: &ApiServer) -> Self {
        Self::new(server.url.as_str())
    }
}

impl Display for Target {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.label)
    }
}

/// Subcommands understood by the agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommandKind {
    Info,
    Attach,
    Detach,
    Unlock,
}

impl CommandKind {
    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Attach => "attach",
            Self::Detach => "detach",
            Self::Unlock => "unlock",
        }
    }

    const fn path(self) -> &'static str {
        match self {
            Self::Info => paths::INFO,
            Self::Attach => paths::ATTACH,
            Self::Detach => paths::DETACH,
            Self::Unlock => paths::UNLOCK,
        }
    }
}

/// Service/destination pair addressed by attach, detach and unlock.
///
/// Values are forwarded untouched; the agent rejects malformed addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DestinationRef {
    pub(crate) service: String,
    pub(crate) dest: String,
}

/// Endpoint path plus query parameters; identical for every target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandSpec {
    kind: CommandKind,
    query: Vec<(&'static str, String)>,
}

impl CommandSpec {
    pub(crate) const fn info() -> Self {
        Self {
            kind: CommandKind::Info,
            query: Vec::new(),
        }
    }

    pub(crate) fn attach(target: &DestinationRef, lock: bool) -> Self {
        Self::membership(CommandKind::Attach, target, Some(lock))
    }

    pub(crate) fn detach(target: &DestinationRef, lock: bool) -> Self {
        Self::membership(CommandKind::Detach, target, Some(lock))
    }

    pub(crate) fn unlock(target: &DestinationRef) -> Self {
        Self::membership(CommandKind::Unlock, target, None)
    }

    fn membership(kind: CommandKind, target: &DestinationRef, lock: Option<bool>) -> Self {
        let mut query = vec![
            (params::SERVICE, target.service.clone()),
            (params::DEST, target.dest.clone()),
        ];
        if let Some(lock) = lock {
            query.push((params::LOCK, lock.to_string()));
        }
        Self { kind, query }
    }

    pub(crate) const fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Full request URL for `target`; query values are percent-encoded.
    pub(crate) fn request_url(&self, target: &Target) -> Result<Url, url::ParseError> {
        let base = target.label().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{}", self.kind.path()))?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(
                self.query
                    .iter()
                    .map(|(name, value)| (*name, value.as_str())),
            );
        }
        Ok(url)
    }
}
