//! Parallel fan-out of one command to every target.
//!
//! # Design
//! - One spawned task per target, no concurrency cap, joined with a full barrier.
//! - Each task fetches, decodes, renders and emits its own block; nothing is
//!   shared between tasks except the immutable command and the sinks.
//! - Failures become that target's [`TargetOutcome`]; siblings are unaffected.

use std::io;
use std::sync::Arc;

use futures_util::future::join_all;
use thiserror::Error;
use tracing::{Instrument, debug, info_span, warn};

use crate::client::{AgentTransport, TransportError};
use crate::decode::{DecodeError, Payload, Presentation, decode};
use crate::output::{ReportSink, error_chain, render_failure, render_payload};
use crate::request::{CommandSpec, Target};

/// Why one target produced no report block.
#[derive(Debug, Error)]
pub(crate) enum TargetError {
    #[error("failed to build request url")]
    Url {
        #[from]
        source: url::ParseError,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("failed to write report block")]
    Emit { source: io::Error },
    #[error("dispatch task aborted: {reason}")]
    Aborted { reason: String },
}

/// Result of one dispatch for one target: exactly one of payload or error.
#[derive(Debug)]
pub(crate) struct TargetOutcome {
    pub(crate) target: Target,
    pub(crate) result: Result<Payload, TargetError>,
}

/// Counts derived from a finished dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DispatchSummary {
    pub(crate) succeeded: usize,
    pub(crate) failed: Vec<String>,
}

impl DispatchSummary {
    pub(crate) fn from_outcomes(outcomes: &[TargetOutcome]) -> Self {
        outcomes
            .iter()
            .fold(Self::default(), |mut summary, outcome| {
                if outcome.result.is_ok() {
                    summary.succeeded += 1;
                } else {
                    summary.failed.push(outcome.target.label().to_string());
                }
                summary
            })
    }
}

/// Fans a [`CommandSpec`] out to a target set.
pub(crate) struct Dispatcher {
    transport: Arc<dyn AgentTransport>,
    report: Arc<ReportSink>,
    diagnostics: Arc<ReportSink>,
}

impl Dispatcher {
    pub(crate) fn new(
        transport: Arc<dyn AgentTransport>,
        report: Arc<ReportSink>,
        diagnostics: Arc<ReportSink>,
    ) -> Self {
        Self {
            transport,
            report,
            diagnostics,
        }
    }

    /// Run `spec` against every target concurrently and wait for all of them.
    ///
    /// Outcomes are returned in target order; blocks are emitted in completion
    /// order. An empty target set is a no-op.
    pub(crate) async fn dispatch(
        &self,
        targets: &[Target],
        spec: &CommandSpec,
        presentation: Presentation,
    ) -> Vec<TargetOutcome> {
        let spec = Arc::new(spec.clone());
        let handles: Vec<_> = targets
            .iter()
            .map(|target| {
                let unit = Unit {
                    transport: Arc::clone(&self.transport),
                    report: Arc::clone(&self.report),
                    diagnostics: Arc::clone(&self.diagnostics),
                    spec: Arc::clone(&spec),
                    presentation,
                };
                let span = info_span!(
                    "agent",
                    command = spec.kind().name(),
                    agent = %target
                );
                tokio::spawn(unit.run(target.clone()).instrument(span))
            })
            .collect();

        let joined = join_all(handles).await;

        targets
            .iter()
            .zip(joined)
            .map(|(target, joined)| {
                let result = joined.unwrap_or_else(|join_err| {
                    let err = TargetError::Aborted {
                        reason: join_err.to_string(),
                    };
                    report_failure(&self.diagnostics, target, &err);
                    Err(err)
                });
                TargetOutcome {
                    target: target.clone(),
                    result,
                }
            })
            .collect()
    }
}

struct Unit {
    transport: Arc<dyn AgentTransport>,
    report: Arc<ReportSink>,
    diagnostics: Arc<ReportSink>,
    spec: Arc<CommandSpec>,
    presentation: Presentation,
}

impl Unit {
    async fn run(self, target: Target) -> Result<Payload, TargetError> {
        let payload = match self.execute(&target).await {
            Ok(payload) => payload,
            Err(err) => {
                report_failure(&self.diagnostics, &target, &err);
                return Err(err);
            }
        };

        let block = render_payload(target.label(), &payload);
        if let Err(source) = self.report.emit(&block) {
            let err = TargetError::Emit { source };
            report_failure(&self.diagnostics, &target, &err);
            return Err(err);
        }
        Ok(payload)
    }

    async fn execute(&self, target: &Target) -> Result<Payload, TargetError> {
        let url = self.spec.request_url(target)?;
        debug!(%url, "sending agent request");
        let response = self.transport.fetch(url).await?;
        if !response.is_success() {
            // Status codes are not interpreted; the body is shown as-is.
            warn!(status = response.status, "agent answered with non-success status");
        }
        Ok(decode(self.presentation, response.body)?)
    }
}

fn report_failure(diagnostics: &ReportSink, target: &Target, err: &TargetError) {
    debug!(agent = %target, error = %error_chain(err), "agent command failed");
    if let Err(emit_err) = diagnostics.emit(&render_failure(target.label(), err)) {
        debug!(error = %emit_err, "failed to write diagnostic line");
    }
}
