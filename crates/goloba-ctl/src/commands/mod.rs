//! Command handlers grouped by concern.

pub(crate) mod destination;
pub(crate) mod info;
