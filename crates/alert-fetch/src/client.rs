//! Store Client Capability

use crate::FetchError;
use alert_core::LegacyAlertRecord;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use tracing::debug;

/// Backing-store query capability.
///
/// The engine only needs filtered record retrieval; transport, auth, and
/// timeout policy belong to the implementation.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Run a query against the given index pattern, returning at most
    /// `max_size` records.
    async fn search(
        &self,
        index_pattern: &str,
        query: &Value,
        max_size: usize,
    ) -> Result<Vec<LegacyAlertRecord>, FetchError>;
}

/// In-memory store used by tests and local runs.
pub struct MemoryStore {
    records: Mutex<Vec<LegacyAlertRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn put(&self, record: LegacyAlertRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }

    /// Extract the bool-filter terms this store understands: cluster uuids
    /// and the watch name.
    fn query_filters(query: &Value) -> (Vec<String>, Option<String>) {
        let mut uuids = Vec::new();
        let mut watch = None;
        if let Some(filters) = query
            .pointer("/bool/filter")
            .and_then(|filters| filters.as_array())
        {
            for filter in filters {
                if let Some(values) = filter
                    .pointer("/terms/metadata.cluster_uuid")
                    .and_then(|values| values.as_array())
                {
                    uuids = values
                        .iter()
                        .filter_map(|value| value.as_str())
                        .map(str::to_string)
                        .collect();
                }
                if let Some(name) = filter
                    .pointer("/term/metadata.watch")
                    .and_then(|name| name.as_str())
                {
                    watch = Some(name.to_string());
                }
            }
        }
        (uuids, watch)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn search(
        &self,
        index_pattern: &str,
        query: &Value,
        max_size: usize,
    ) -> Result<Vec<LegacyAlertRecord>, FetchError> {
        let (uuids, watch) = Self::query_filters(query);
        let records = self
            .records
            .lock()
            .map_err(|e| FetchError::Query(format!("Lock error: {}", e)))?;

        let hits: Vec<_> = records
            .iter()
            .filter(|r| uuids.is_empty() || uuids.contains(&r.metadata.cluster_uuid))
            .filter(|r| watch.as_deref().map_or(true, |w| r.metadata.watch == w))
            .take(max_size)
            .cloned()
            .collect();

        debug!(
            "Memory store search on {} matched {} of {} records",
            index_pattern,
            hits.len(),
            records.len()
        );
        Ok(hits)
    }
}
