//! Nodes Changed Alert Implementation

use alert_core::{
    map_legacy_severity, AlertCluster, AlertData, AlertInstanceState, AlertMessage, AlertState,
    NodeChangeList,
};
use alert_engine::{
    ActionDispatcher, ActionVariable, AlertType, AlertTypeParams, ScheduledAction,
    ALERT_STATE_FIRING, ALERT_STATE_RESOLVED,
};
use alert_fetch::{ccs_index_pattern, fetch_legacy_alerts, FetchError, StoreClient};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::debug;

pub const ALERT_NODES_CHANGED: &str = "monitoring_alert_nodes_changed";
/// Watch name the legacy records carry for this alert.
pub const WATCH_NAME: &str = "elasticsearch_nodes";

const SHORT_ACTION_TEXT: &str = "Verify that you added, removed, or restarted nodes.";
const VIEW_NODES_LINK: &str = "[View nodes](elasticsearch/nodes)";

/// Alert on Elasticsearch node topology changes, one instance per cluster.
pub struct NodesChangedAlert {
    action_variables: Vec<ActionVariable>,
}

impl NodesChangedAlert {
    /// Build the alert type, appending its delta variables to the shared
    /// defaults the engine hands in.
    pub fn new(defaults: Vec<ActionVariable>) -> Self {
        let mut action_variables = vec![
            ActionVariable {
                name: "added",
                description: "The list of nodes added to the cluster.",
            },
            ActionVariable {
                name: "removed",
                description: "The list of nodes removed from the cluster.",
            },
            ActionVariable {
                name: "restarted",
                description: "The list of nodes restarted in the cluster.",
            },
        ];
        action_variables.extend(defaults);
        Self { action_variables }
    }

    fn joined(map: &BTreeMap<String, String>) -> String {
        map.values().cloned().collect::<Vec<_>>().join(",")
    }
}

#[async_trait]
impl AlertType for NodesChangedAlert {
    fn id(&self) -> &'static str {
        ALERT_NODES_CHANGED
    }

    fn label(&self) -> &'static str {
        "Nodes changed"
    }

    fn action_variables(&self) -> &[ActionVariable] {
        &self.action_variables
    }

    async fn fetch_data(
        &self,
        params: &AlertTypeParams,
        store: &dyn StoreClient,
        clusters: &[AlertCluster],
        available_ccs: &[String],
    ) -> Result<Vec<AlertData>, FetchError> {
        let index_pattern = ccs_index_pattern(&params.index_pattern, available_ccs);
        let records = fetch_legacy_alerts(
            store,
            clusters,
            &index_pattern,
            WATCH_NAME,
            params.max_bucket_size,
        )
        .await?;

        Ok(records
            .into_iter()
            .map(|record| AlertData {
                instance_key: record.metadata.cluster_uuid.clone(),
                cluster_uuid: record.metadata.cluster_uuid.clone(),
                // Every record carries its own resolution semantics via a
                // resolved timestamp, so fetched records always fire.
                should_fire: true,
                severity: map_legacy_severity(record.metadata.severity),
                meta: record,
            })
            .collect())
    }

    fn ui_message(&self, alert_state: &AlertState, item: &AlertData) -> AlertMessage {
        if !alert_state.ui.is_firing {
            return AlertMessage::new("No changes in Elasticsearch nodes for this cluster.");
        }

        let states: NodeChangeList = item.meta.node_changes();
        if states.is_empty() {
            // Malformed or legacy records without delta detail.
            return AlertMessage::new("Elasticsearch nodes have changed");
        }

        let mut clauses = Vec::new();
        if !states.added.is_empty() {
            clauses.push(format!(
                "Elasticsearch nodes '{}' added to this cluster.",
                Self::joined(&states.added)
            ));
        }
        if !states.removed.is_empty() {
            clauses.push(format!(
                "Elasticsearch nodes '{}' removed from this cluster.",
                Self::joined(&states.removed)
            ));
        }
        if !states.restarted.is_empty() {
            clauses.push(format!(
                "Elasticsearch nodes '{}' restarted in this cluster.",
                Self::joined(&states.restarted)
            ));
        }
        AlertMessage::new(clauses.join(" "))
    }

    fn execute_actions(
        &self,
        dispatcher: &ActionDispatcher,
        instance_state: &AlertInstanceState,
        item: &AlertData,
        cluster: &AlertCluster,
    ) {
        // Cold start: nothing has ever fired, a resolution notice here
        // would be spurious.
        if instance_state.is_cold() {
            debug!("No alert states for {}, skipping dispatch", cluster.cluster_uuid);
            return;
        }

        let alert_state = &instance_state.alert_states[0];
        if !alert_state.ui.is_firing {
            let message = format!(
                "Elasticsearch nodes changed alert is resolved for {}.",
                cluster.cluster_name
            );
            dispatcher.schedule(
                ScheduledAction::new("default")
                    .with_param("internal_short_message", message.as_str())
                    .with_param("internal_full_message", message.as_str())
                    .with_param("state", ALERT_STATE_RESOLVED)
                    .with_param("cluster_name", cluster.cluster_name.as_str()),
            );
            return;
        }

        let states = item.meta.node_changes();
        let added = Self::joined(&states.added);
        let removed = Self::joined(&states.removed);
        let restarted = Self::joined(&states.restarted);
        let short_message = format!(
            "Nodes changed alert is firing for {}. {}",
            cluster.cluster_name, SHORT_ACTION_TEXT
        );
        let full_message = format!(
            "Nodes changed alert is firing for {}. The following Elasticsearch nodes have been added:{} removed:{} restarted:{}. {}",
            cluster.cluster_name, added, removed, restarted, VIEW_NODES_LINK
        );
        dispatcher.schedule(
            ScheduledAction::new("default")
                .with_param("internal_short_message", short_message)
                .with_param("internal_full_message", full_message)
                .with_param("state", ALERT_STATE_FIRING)
                .with_param("cluster_name", cluster.cluster_name.as_str())
                .with_param("added", added)
                .with_param("removed", removed)
                .with_param("restarted", restarted)
                .with_param("action", VIEW_NODES_LINK)
                .with_param("action_plain", SHORT_ACTION_TEXT),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_core::{AlertSeverity, LegacyAlertMetadata, LegacyAlertRecord};
    use alert_engine::default_action_variables;

    fn record(nodes: Option<NodeChangeList>) -> LegacyAlertRecord {
        LegacyAlertRecord {
            prefix: "Elasticsearch cluster alert".to_string(),
            message: "Elasticsearch cluster nodes have changed!".to_string(),
            resolved_timestamp: None,
            metadata: LegacyAlertMetadata {
                cluster_uuid: "abc123".to_string(),
                watch: WATCH_NAME.to_string(),
                severity: 1100,
            },
            nodes,
        }
    }

    fn data(nodes: Option<NodeChangeList>) -> AlertData {
        let meta = record(nodes);
        AlertData {
            instance_key: meta.metadata.cluster_uuid.clone(),
            cluster_uuid: meta.metadata.cluster_uuid.clone(),
            should_fire: true,
            severity: map_legacy_severity(meta.metadata.severity),
            meta,
        }
    }

    fn alert() -> NodesChangedAlert {
        NodesChangedAlert::new(default_action_variables())
    }

    fn firing_state(item: &AlertData) -> AlertState {
        AlertState::firing(item.severity, item.meta.clone())
    }

    fn resolved_state(item: &AlertData) -> AlertState {
        let mut state = firing_state(item);
        state.resolve(chrono::Utc::now());
        state
    }

    fn changes(added: &[(&str, &str)], removed: &[(&str, &str)], restarted: &[(&str, &str)]) -> NodeChangeList {
        let to_map = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>()
        };
        NodeChangeList {
            added: to_map(added),
            removed: to_map(removed),
            restarted: to_map(restarted),
        }
    }

    #[test]
    fn test_added_only_message() {
        let item = data(Some(changes(&[("n1", "node-1")], &[], &[])));
        let message = alert().ui_message(&firing_state(&item), &item);
        assert_eq!(
            message.text,
            "Elasticsearch nodes 'node-1' added to this cluster."
        );
    }

    #[test]
    fn test_all_clauses_in_fixed_order() {
        let item = data(Some(changes(
            &[("n1", "node-1"), ("n2", "node-2")],
            &[("n3", "node-3")],
            &[("n4", "node-4")],
        )));
        let message = alert().ui_message(&firing_state(&item), &item);
        assert_eq!(
            message.text,
            "Elasticsearch nodes 'node-1,node-2' added to this cluster. \
             Elasticsearch nodes 'node-3' removed from this cluster. \
             Elasticsearch nodes 'node-4' restarted in this cluster."
        );
    }

    #[test]
    fn test_empty_deltas_fall_back_to_generic_message() {
        let item = data(Some(changes(&[], &[], &[])));
        let message = alert().ui_message(&firing_state(&item), &item);
        assert_eq!(message.text, "Elasticsearch nodes have changed");
    }

    #[test]
    fn test_missing_deltas_fall_back_to_generic_message() {
        let item = data(None);
        let message = alert().ui_message(&firing_state(&item), &item);
        assert_eq!(message.text, "Elasticsearch nodes have changed");
    }

    #[test]
    fn test_resolved_message_ignores_deltas() {
        let item = data(Some(changes(&[("n1", "node-1")], &[], &[])));
        let message = alert().ui_message(&resolved_state(&item), &item);
        assert_eq!(
            message.text,
            "No changes in Elasticsearch nodes for this cluster."
        );
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let item = data(Some(changes(&[("n1", "node-1")], &[("n2", "node-2")], &[])));
        let state = firing_state(&item);
        let alert = alert();
        assert_eq!(alert.ui_message(&state, &item), alert.ui_message(&state, &item));
    }

    #[tokio::test]
    async fn test_cold_start_skips_dispatch() {
        let (dispatcher, mut rx) = ActionDispatcher::channel(4);
        let item = data(None);
        let cluster = AlertCluster::new("abc123", "production");

        alert().execute_actions(&dispatcher, &AlertInstanceState::default(), &item, &cluster);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_firing_action_payload() {
        let (dispatcher, mut rx) = ActionDispatcher::channel(4);
        let item = data(Some(changes(&[("n1", "node-1")], &[], &[("n2", "node-2")])));
        let cluster = AlertCluster::new("abc123", "production");
        let instance_state = AlertInstanceState {
            alert_states: vec![firing_state(&item)],
        };

        alert().execute_actions(&dispatcher, &instance_state, &item, &cluster);
        let action = rx.try_recv().unwrap();
        assert_eq!(action.action_group, "default");
        assert_eq!(action.text_param("state"), Some(ALERT_STATE_FIRING));
        assert_eq!(action.text_param("cluster_name"), Some("production"));
        assert_eq!(action.text_param("added"), Some("node-1"));
        assert_eq!(action.text_param("removed"), Some(""));
        assert_eq!(action.text_param("restarted"), Some("node-2"));
        assert_eq!(action.text_param("action"), Some(VIEW_NODES_LINK));
        assert_eq!(action.text_param("action_plain"), Some(SHORT_ACTION_TEXT));
        assert_eq!(
            action.text_param("internal_short_message"),
            Some("Nodes changed alert is firing for production. Verify that you added, removed, or restarted nodes.")
        );
        assert_eq!(
            action.text_param("internal_full_message"),
            Some("Nodes changed alert is firing for production. The following Elasticsearch nodes have been added:node-1 removed: restarted:node-2. [View nodes](elasticsearch/nodes)")
        );
    }

    #[tokio::test]
    async fn test_resolved_action_payload() {
        let (dispatcher, mut rx) = ActionDispatcher::channel(4);
        let item = data(None);
        let cluster = AlertCluster::new("abc123", "production");
        let instance_state = AlertInstanceState {
            alert_states: vec![resolved_state(&item)],
        };

        alert().execute_actions(&dispatcher, &instance_state, &item, &cluster);
        let action = rx.try_recv().unwrap();
        assert_eq!(action.text_param("state"), Some(ALERT_STATE_RESOLVED));
        assert_eq!(
            action.text_param("internal_short_message"),
            Some("Elasticsearch nodes changed alert is resolved for production.")
        );
        assert_eq!(
            action.text_param("internal_full_message"),
            Some("Elasticsearch nodes changed alert is resolved for production.")
        );
        assert_eq!(action.text_param("cluster_name"), Some("production"));
        // Exactly one action per transition.
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_action_variables_include_deltas_and_defaults() {
        let alert = alert();
        let names: Vec<&str> = alert.action_variables().iter().map(|v| v.name).collect();
        assert!(names.contains(&"added"));
        assert!(names.contains(&"removed"));
        assert!(names.contains(&"restarted"));
        assert!(names.contains(&"internal_short_message"));
        assert!(names.contains(&"cluster_name"));
    }

    #[test]
    fn test_severity_comes_from_legacy_code() {
        let item = data(None);
        assert_eq!(item.severity, AlertSeverity::Warning);
    }
}
