//! Transition State Tracker
//!
//! Owns the previous-vs-current comparison for every alert instance, so
//! alert types only react to the firing flag they are handed.

use alert_core::{AlertData, AlertInstanceState, AlertState};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tracing::debug;

struct TrackedInstance {
    state: AlertInstanceState,
    /// Last data that fired, kept for rendering the resolution notice.
    last_data: AlertData,
}

/// A just-resolved instance, snapshotted before its states were cleared.
pub struct ResolvedInstance {
    pub instance_key: String,
    pub state: AlertInstanceState,
    pub item: AlertData,
}

/// Per-instance transition bookkeeping for one alert type.
///
/// Instances move not-firing -> firing -> resolved -> not-firing. After a
/// resolve the stored states are emptied, so the resolution notice goes
/// out exactly once and a cold instance never produces one.
#[derive(Default)]
pub struct StateTracker {
    instances: HashMap<String, TrackedInstance>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a firing state for the instance keyed by `item.instance_key`,
    /// returning the snapshot handed to action callbacks.
    pub fn install_firing(&mut self, item: &AlertData, state: AlertState) -> AlertInstanceState {
        debug!("Instance {} firing", item.instance_key);
        let instance_state = AlertInstanceState {
            alert_states: vec![state],
        };
        self.instances.insert(
            item.instance_key.clone(),
            TrackedInstance {
                state: instance_state.clone(),
                last_data: item.clone(),
            },
        );
        instance_state
    }

    /// Flip a previously-firing instance to resolved.
    ///
    /// Returns `None` for unknown or already-resolved instances; otherwise
    /// returns a snapshot carrying the resolved states and the last firing
    /// data, and empties the stored states.
    pub fn resolve(&mut self, instance_key: &str) -> Option<ResolvedInstance> {
        let instance = self.instances.get_mut(instance_key)?;
        if !instance.state.alert_states.iter().any(|s| s.ui.is_firing) {
            return None;
        }

        debug!("Instance {} resolved", instance_key);
        let now = Utc::now();
        for state in &mut instance.state.alert_states {
            state.resolve(now);
        }
        let snapshot = instance.state.clone();
        instance.state.alert_states.clear();

        Some(ResolvedInstance {
            instance_key: instance_key.to_string(),
            state: snapshot,
            item: instance.last_data.clone(),
        })
    }

    /// Resolve every firing instance whose key was not seen this tick.
    pub fn resolve_absent(&mut self, seen: &HashSet<String>) -> Vec<ResolvedInstance> {
        let absent: Vec<String> = self
            .instances
            .keys()
            .filter(|key| !seen.contains(*key))
            .cloned()
            .collect();
        absent
            .iter()
            .filter_map(|key| self.resolve(key))
            .collect()
    }

    /// Current state for an instance, if tracked.
    pub fn instance(&self, instance_key: &str) -> Option<&AlertInstanceState> {
        self.instances.get(instance_key).map(|i| &i.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_core::{AlertSeverity, LegacyAlertMetadata, LegacyAlertRecord};

    fn data(instance_key: &str) -> AlertData {
        let meta = LegacyAlertRecord {
            prefix: String::new(),
            message: String::new(),
            resolved_timestamp: None,
            metadata: LegacyAlertMetadata {
                cluster_uuid: instance_key.to_string(),
                watch: "elasticsearch_nodes".to_string(),
                severity: 1000,
            },
            nodes: None,
        };
        AlertData {
            instance_key: instance_key.to_string(),
            cluster_uuid: instance_key.to_string(),
            should_fire: true,
            severity: AlertSeverity::Warning,
            meta,
        }
    }

    fn fire(tracker: &mut StateTracker, key: &str) {
        let item = data(key);
        let state = AlertState::firing(item.severity, item.meta.clone());
        tracker.install_firing(&item, state);
    }

    #[test]
    fn test_resolve_unknown_instance_is_none() {
        let mut tracker = StateTracker::new();
        assert!(tracker.resolve("abc").is_none());
    }

    #[test]
    fn test_resolve_fires_exactly_once() {
        let mut tracker = StateTracker::new();
        fire(&mut tracker, "abc");

        let resolved = tracker.resolve("abc").unwrap();
        assert!(!resolved.state.alert_states[0].ui.is_firing);
        assert!(resolved.state.alert_states[0].ui.resolved_timestamp.is_some());

        // Stored state was emptied, a second resolve yields nothing.
        assert!(tracker.instance("abc").unwrap().is_cold());
        assert!(tracker.resolve("abc").is_none());
    }

    #[test]
    fn test_resolve_absent_only_touches_missing_keys() {
        let mut tracker = StateTracker::new();
        fire(&mut tracker, "abc");
        fire(&mut tracker, "def");

        let seen: HashSet<String> = ["abc".to_string()].into_iter().collect();
        let resolved = tracker.resolve_absent(&seen);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].instance_key, "def");

        // The seen instance is still firing.
        assert!(tracker.instance("abc").unwrap().alert_states[0].ui.is_firing);
    }

    #[test]
    fn test_refire_after_resolve() {
        let mut tracker = StateTracker::new();
        fire(&mut tracker, "abc");
        tracker.resolve("abc").unwrap();
        fire(&mut tracker, "abc");
        assert!(tracker.resolve("abc").is_some());
    }
}
