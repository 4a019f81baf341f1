//! Alert Evaluation Engine
//!
//! The framework half of the alerting pipeline: alert types implement the
//! `AlertType` capability, the engine owns firing/resolved transition
//! bookkeeping, action dispatch, and the evaluation tick loop.

mod alert_type;
mod config;
mod dispatch;
mod scheduler;
mod state;

pub use alert_type::{
    default_action_variables, ActionVariable, AlertType, AlertTypeParams, ALERT_STATE_FIRING,
    ALERT_STATE_RESOLVED,
};
pub use config::EngineConfig;
pub use dispatch::{ActionDispatcher, ActionParam, ScheduledAction};
pub use scheduler::EvaluationScheduler;
pub use state::{ResolvedInstance, StateTracker};

use thiserror::Error;

/// Engine-level errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Fetch(#[from] alert_fetch::FetchError),
}
