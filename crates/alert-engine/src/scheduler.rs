//! Evaluation Scheduler
//!
//! Drives the fetch -> evaluate -> track -> render -> dispatch pipeline
//! once per tick for every registered alert type. Evaluations are
//! serialized per alert type, so tracker updates are race-free.

use crate::alert_type::{AlertType, AlertTypeParams};
use crate::config::EngineConfig;
use crate::dispatch::ActionDispatcher;
use crate::state::{ResolvedInstance, StateTracker};
use crate::EngineError;
use alert_core::{AlertCluster, AlertState};
use alert_fetch::StoreClient;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

struct RegisteredAlert {
    alert: Box<dyn AlertType>,
    tracker: StateTracker,
}

/// Periodic alert evaluation over a registered set of alert types.
pub struct EvaluationScheduler {
    config: EngineConfig,
    store: Arc<dyn StoreClient>,
    clusters: Vec<AlertCluster>,
    available_ccs: Vec<String>,
    dispatcher: ActionDispatcher,
    alerts: Vec<RegisteredAlert>,
}

impl EvaluationScheduler {
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn StoreClient>,
        dispatcher: ActionDispatcher,
    ) -> Self {
        Self {
            config,
            store,
            clusters: Vec::new(),
            available_ccs: Vec::new(),
            dispatcher,
            alerts: Vec::new(),
        }
    }

    /// Replace the monitored cluster scope.
    pub fn set_clusters(&mut self, clusters: Vec<AlertCluster>) {
        self.clusters = clusters;
    }

    /// Replace the available cross-cluster-search remotes.
    pub fn set_available_ccs(&mut self, remotes: Vec<String>) {
        self.available_ccs = remotes;
    }

    /// Register an alert type for evaluation.
    pub fn register(&mut self, alert: Box<dyn AlertType>) {
        info!("Registered alert type {}", alert.id());
        self.alerts.push(RegisteredAlert {
            alert,
            tracker: StateTracker::new(),
        });
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }

    /// Run one evaluation tick across all registered alert types.
    ///
    /// A fetch failure skips that alert type's tick with a warning; it
    /// never aborts the other alert types or the loop.
    pub async fn run_tick(&mut self) {
        for entry in &mut self.alerts {
            let params = AlertTypeParams {
                index_pattern: self.config.alerts_index_pattern.clone(),
                max_bucket_size: self.config.max_bucket_size,
            };
            let id = entry.alert.id();
            if let Err(e) = Self::run_alert(
                entry,
                &params,
                self.store.as_ref(),
                &self.clusters,
                &self.available_ccs,
                &self.dispatcher,
            )
            .await
            {
                warn!("Skipping tick for alert {}: {}", id, e);
            }
        }
    }

    async fn run_alert(
        entry: &mut RegisteredAlert,
        params: &AlertTypeParams,
        store: &dyn StoreClient,
        clusters: &[AlertCluster],
        available_ccs: &[String],
        dispatcher: &ActionDispatcher,
    ) -> Result<(), EngineError> {
        let alert = entry.alert.as_ref();
        let data = alert
            .fetch_data(params, store, clusters, available_ccs)
            .await?;
        debug!("Alert {} evaluated {} records", alert.id(), data.len());

        let mut seen = HashSet::new();
        for item in &data {
            seen.insert(item.instance_key.clone());
            if item.should_fire {
                let mut state = AlertState::firing(item.severity, item.meta.clone());
                state.ui.message = Some(alert.ui_message(&state, item));
                let snapshot = entry.tracker.install_firing(item, state);
                let cluster = cluster_for(clusters, &item.cluster_uuid);
                alert.execute_actions(dispatcher, &snapshot, item, &cluster);
            } else if let Some(resolved) = entry.tracker.resolve(&item.instance_key) {
                dispatch_resolved(alert, dispatcher, clusters, resolved);
            }
        }

        // Firing instances that produced no data this tick have resolved.
        for resolved in entry.tracker.resolve_absent(&seen) {
            dispatch_resolved(alert, dispatcher, clusters, resolved);
        }
        Ok(())
    }

    /// Run the tick loop until the shutdown receiver fires.
    pub async fn run(&mut self, mut shutdown: oneshot::Receiver<()>) {
        info!(
            "Starting evaluation scheduler with {} alert types, interval {:?}",
            self.alerts.len(),
            self.config.check_interval()
        );
        let mut ticker = tokio::time::interval(self.config.check_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Stopping evaluation scheduler");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_tick().await;
                }
            }
        }
    }
}

fn cluster_for(clusters: &[AlertCluster], cluster_uuid: &str) -> AlertCluster {
    clusters
        .iter()
        .find(|c| c.cluster_uuid == cluster_uuid)
        .cloned()
        .unwrap_or_else(|| {
            debug!("No cluster metadata for {}, using uuid as name", cluster_uuid);
            AlertCluster::new(cluster_uuid, cluster_uuid)
        })
}

fn dispatch_resolved(
    alert: &dyn AlertType,
    dispatcher: &ActionDispatcher,
    clusters: &[AlertCluster],
    mut resolved: ResolvedInstance,
) {
    if let Some(first) = resolved.state.alert_states.first().cloned() {
        let message = alert.ui_message(&first, &resolved.item);
        if let Some(first) = resolved.state.alert_states.first_mut() {
            first.ui.message = Some(message);
        }
    }
    let cluster = cluster_for(clusters, &resolved.item.cluster_uuid);
    alert.execute_actions(dispatcher, &resolved.state, &resolved.item, &cluster);
}
