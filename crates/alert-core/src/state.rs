//! Per-Instance Alert State
//!
//! Owned by the evaluation framework, not by alert types. Alert types only
//! read the firing flag the state tracker hands them.

use crate::{AlertMessage, AlertSeverity, LegacyAlertRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// UI-facing portion of an alert state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertUiState {
    pub is_firing: bool,
    pub severity: AlertSeverity,
    pub message: Option<AlertMessage>,
    pub resolved_timestamp: Option<DateTime<Utc>>,
}

/// One tracked alert state, with the record that triggered it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertState {
    pub ui: AlertUiState,
    pub meta: LegacyAlertRecord,
}

impl AlertState {
    /// A freshly-firing state for the given record.
    pub fn firing(severity: AlertSeverity, meta: LegacyAlertRecord) -> Self {
        Self {
            ui: AlertUiState {
                is_firing: true,
                severity,
                message: None,
                resolved_timestamp: None,
            },
            meta,
        }
    }

    /// Flip this state to resolved, stamping the resolution time.
    pub fn resolve(&mut self, at: DateTime<Utc>) {
        self.ui.is_firing = false;
        self.ui.resolved_timestamp = Some(at);
    }
}

/// Persisted state for one alert instance across evaluation ticks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertInstanceState {
    pub alert_states: Vec<AlertState>,
}

impl AlertInstanceState {
    /// True before any firing has ever been observed (cold start).
    pub fn is_cold(&self) -> bool {
        self.alert_states.is_empty()
    }
}
