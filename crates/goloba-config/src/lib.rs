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

//! Configuration for the goloba control client.
//!
//! Layout: `model.rs` (validated types), `loader.rs` (YAML ingestion),
//! `validate.rs` (per-field checks), `duration.rs` (timeout parsing),
//! `error.rs` (error taxonomy).

mod duration;
pub mod error;
pub mod loader;
pub mod model;
mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{DEFAULT_CONFIG_PATH, from_yaml_str, load};
pub use model::{ApiServer, CtlConfig};
