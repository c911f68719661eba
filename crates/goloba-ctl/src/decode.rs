//! Interpretation of agent response bodies.

use goloba_api_models::Info;
use thiserror::Error;

/// How a command's answers are presented, chosen once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presentation {
    /// `info --format text`: decode the status document into a table.
    StatusTable,
    /// `info --format json`, `attach`, `detach`: label plus raw body.
    Labeled,
    /// `unlock`: raw body only.
    Verbatim,
}

/// Decoded, presentable answer from one agent. Never mutated after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Payload {
    Labeled(Vec<u8>),
    Verbatim(Vec<u8>),
    Report(Info),
}

#[derive(Debug, Error)]
#[error("failed to decode status report")]
pub(crate) struct DecodeError {
    #[from]
    source: serde_json::Error,
}

pub(crate) fn decode(presentation: Presentation, body: Vec<u8>) -> Result<Payload, DecodeError> {
    match presentation {
        Presentation::StatusTable => Ok(Payload::Report(serde_json::from_slice(&body)?)),
        Presentation::Labeled => Ok(Payload::Labeled(body)),
        Presentation::Verbatim => Ok(Payload::Verbatim(body)),
    }
}
