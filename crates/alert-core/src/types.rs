//! Core Alert Types

use crate::AlertSeverity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A monitored cluster scope. Supplied externally, immutable per tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertCluster {
    pub cluster_uuid: String,
    pub cluster_name: String,
}

impl AlertCluster {
    pub fn new(cluster_uuid: impl Into<String>, cluster_name: impl Into<String>) -> Self {
        Self {
            cluster_uuid: cluster_uuid.into(),
            cluster_name: cluster_name.into(),
        }
    }
}

/// Node deltas carried by a topology-change record, node id -> node name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeChangeList {
    #[serde(default)]
    pub added: BTreeMap<String, String>,
    #[serde(default)]
    pub removed: BTreeMap<String, String>,
    #[serde(default)]
    pub restarted: BTreeMap<String, String>,
}

impl NodeChangeList {
    /// True when no delta map has any entries.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.restarted.is_empty()
    }
}

/// Metadata block of a legacy watch record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyAlertMetadata {
    pub cluster_uuid: String,
    pub watch: String,
    pub severity: i64,
}

/// Raw event from the backing store, produced by the fetcher. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyAlertRecord {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub message: String,
    pub resolved_timestamp: Option<DateTime<Utc>>,
    pub metadata: LegacyAlertMetadata,
    /// Missing on malformed/older records; callers default to empty deltas.
    pub nodes: Option<NodeChangeList>,
}

impl LegacyAlertRecord {
    /// Node deltas with the defensive empty default for malformed records.
    pub fn node_changes(&self) -> NodeChangeList {
        self.nodes.clone().unwrap_or_default()
    }
}

/// One evaluated record: the alert decision for a single instance key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertData {
    /// Grouping key for state tracking (one instance per cluster).
    pub instance_key: String,
    pub cluster_uuid: String,
    pub should_fire: bool,
    pub severity: AlertSeverity,
    pub meta: LegacyAlertRecord,
}

/// Human-readable summary produced per render call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub text: String,
}

impl AlertMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
