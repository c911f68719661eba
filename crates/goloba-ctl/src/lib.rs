#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Administrative client for a fleet of goloba load-balancer agents.
//!
//! Every command is fanned out to all configured agents in parallel and each
//! agent's answer is printed as one contiguous block.
//!
//! Layout:
//! - `cli.rs`: argument parsing, logging/config bootstrap and command dispatch
//! - `commands/`: command handlers grouped by concern
//! - `client.rs`: agent transport, shared HTTP client and CLI errors
//! - `request.rs`: targets and per-command request descriptors
//! - `dispatch.rs`: parallel fan-out with a join barrier
//! - `decode.rs`: response body interpretation
//! - `output.rs`: block renderers and the serialized output sink
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod decode;
pub(crate) mod dispatch;
pub(crate) mod output;
pub(crate) mod request;

#[cfg(test)]
pub(crate) mod test_support;

pub use cli::run;
