//! Alert Data Model
//!
//! Shared types for the alert evaluation pipeline: monitored clusters,
//! legacy watch records, evaluated alert data, and per-instance state.

mod severity;
mod state;
mod types;

pub use severity::{map_legacy_severity, AlertSeverity};
pub use state::{AlertInstanceState, AlertState, AlertUiState};
pub use types::{
    AlertCluster, AlertData, AlertMessage, LegacyAlertMetadata, LegacyAlertRecord, NodeChangeList,
};
