//! Legacy Alert Retrieval

use crate::{FetchError, StoreClient};
use alert_core::{AlertCluster, LegacyAlertRecord};
use serde_json::json;
use tracing::debug;

/// Fetch legacy watch records for the given clusters and watch name.
///
/// Returns an empty vec for an empty cluster list without touching the
/// store. Store errors propagate; the caller owns tick-level handling.
pub async fn fetch_legacy_alerts(
    client: &dyn StoreClient,
    clusters: &[AlertCluster],
    index_pattern: &str,
    watch_name: &str,
    max_bucket_size: usize,
) -> Result<Vec<LegacyAlertRecord>, FetchError> {
    if clusters.is_empty() {
        return Ok(Vec::new());
    }

    let cluster_uuids: Vec<&str> = clusters.iter().map(|c| c.cluster_uuid.as_str()).collect();
    let query = json!({
        "bool": {
            "filter": [
                { "terms": { "metadata.cluster_uuid": cluster_uuids } },
                { "term": { "metadata.watch": watch_name } }
            ]
        }
    });

    let records = client.search(index_pattern, &query, max_bucket_size).await?;
    debug!(
        "Fetched {} legacy alerts for watch {} across {} clusters",
        records.len(),
        watch_name,
        clusters.len()
    );
    Ok(records)
}
