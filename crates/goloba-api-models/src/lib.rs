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
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the goloba agent control API.
//!
//! The agent answers `GET /info` with an [`Info`] document. Field names follow
//! the agent's JSON encoding (camelCase for the connection counters), and the
//! order of services and destinations is preserved exactly as received since
//! it reflects rotation order on the agent.
use serde::Deserialize;

/// Control endpoint paths exposed by every agent.
pub mod paths {
    /// Status query.
    pub const INFO: &str = "/info";
    /// Return a destination to rotation.
    pub const ATTACH: &str = "/attach";
    /// Remove a destination from rotation.
    pub const DETACH: &str = "/detach";
    /// Drop the administrative lock on a destination.
    pub const UNLOCK: &str = "/unlock";
}

/// Query parameter names accepted by the attach/detach/unlock endpoints.
pub mod params {
    /// Virtual service address in `<address>:<port>` form.
    pub const SERVICE: &str = "service";
    /// Destination address in `<address>:<port>` form.
    pub const DEST: &str = "dest";
    /// Whether the new state should survive future health-check results.
    pub const LOCK: &str = "lock";
}

/// Status document returned by `GET /info`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Info {
    /// Virtual services in agent order.
    #[serde(default)]
    pub services: Vec<Service>,
}

/// A load-balanced virtual service.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Service {
    /// Transport protocol, e.g. `tcp`.
    pub protocol: String,
    /// Virtual IP address.
    pub address: String,
    /// Virtual port.
    pub port: u16,
    /// Scheduling algorithm name, e.g. `wrr`.
    pub schedule: String,
    /// Real servers behind the service in rotation order.
    pub destinations: Vec<Destination>,
}

/// One real server behind a [`Service`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Destination {
    /// Real server IP address.
    pub address: String,
    /// Real server port.
    pub port: u16,
    /// Forwarding method, e.g. `droute`, `masq` or `tunnel`.
    pub forward: String,
    /// Scheduling weight.
    pub weight: u32,
    /// Active connection count.
    pub active_conn: u32,
    /// Inactive connection count.
    pub inactive_conn: u32,
    /// Temporarily removed from rotation by health checking.
    pub detached: bool,
    /// Administrative override pinning the current attach state.
    pub locked: bool,
}
