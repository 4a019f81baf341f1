//! Alert Type Capability

use crate::dispatch::ActionDispatcher;
use alert_core::{AlertCluster, AlertData, AlertInstanceState, AlertMessage, AlertState};
use alert_fetch::{FetchError, StoreClient};
use async_trait::async_trait;

/// State marker attached to firing action payloads.
pub const ALERT_STATE_FIRING: &str = "firing";
/// State marker attached to resolved action payloads.
pub const ALERT_STATE_RESOLVED: &str = "resolved";

/// A template variable an alert type exposes to notification channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionVariable {
    pub name: &'static str,
    pub description: &'static str,
}

/// Variables every alert type exposes, passed explicitly into alert-type
/// constructors rather than inherited from shared module state.
pub fn default_action_variables() -> Vec<ActionVariable> {
    vec![
        ActionVariable {
            name: "internal_short_message",
            description: "The short internal message generated by the alert.",
        },
        ActionVariable {
            name: "internal_full_message",
            description: "The full internal message generated by the alert.",
        },
        ActionVariable {
            name: "state",
            description: "The current state of the alert (firing or resolved).",
        },
        ActionVariable {
            name: "cluster_name",
            description: "The name of the cluster to which the instance belongs.",
        },
        ActionVariable {
            name: "action",
            description: "The recommended action, as a markdown link.",
        },
        ActionVariable {
            name: "action_plain",
            description: "The recommended action, as plain text.",
        },
    ]
}

/// Scope parameters handed to every `fetch_data` call.
#[derive(Debug, Clone)]
pub struct AlertTypeParams {
    /// Base index pattern, before cross-cluster expansion.
    pub index_pattern: String,
    /// Upper bound on records fetched per tick.
    pub max_bucket_size: usize,
}

/// The capability an alert type must satisfy.
///
/// Implementations are pure over (params, fetched data): transition
/// bookkeeping lives in the engine so every alert type gets identical
/// firing/resolved semantics.
#[async_trait]
pub trait AlertType: Send + Sync {
    /// Stable identifier for this alert type.
    fn id(&self) -> &'static str;

    /// Human-readable label.
    fn label(&self) -> &'static str;

    /// Template variables available to notification channels.
    fn action_variables(&self) -> &[ActionVariable];

    /// Query the backing store and evaluate each record into alert data.
    async fn fetch_data(
        &self,
        params: &AlertTypeParams,
        store: &dyn StoreClient,
        clusters: &[AlertCluster],
        available_ccs: &[String],
    ) -> Result<Vec<AlertData>, FetchError>;

    /// Render the human-readable summary for one state/data pair.
    fn ui_message(&self, alert_state: &AlertState, item: &AlertData) -> AlertMessage;

    /// Schedule notification actions for one instance transition.
    fn execute_actions(
        &self,
        dispatcher: &ActionDispatcher,
        instance_state: &AlertInstanceState,
        item: &AlertData,
        cluster: &AlertCluster,
    );
}
