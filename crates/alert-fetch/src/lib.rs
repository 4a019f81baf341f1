//! Alert Fetch Layer
//!
//! Resolves cross-cluster index patterns and pulls legacy watch records
//! from the backing store through the `StoreClient` capability.

mod ccs;
mod client;
mod fetch;

pub use ccs::ccs_index_pattern;
pub use client::{MemoryStore, StoreClient};
pub use fetch::fetch_legacy_alerts;

use thiserror::Error;

/// Errors from the backing store.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Store query failed: {0}")]
    Query(String),
    #[error("Store capability not configured: {0}")]
    NotConfigured(&'static str),
}
