//! Action Dispatch

use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// One value in an action payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionParam {
    Text(String),
    Flag(bool),
}

impl From<String> for ActionParam {
    fn from(value: String) -> Self {
        ActionParam::Text(value)
    }
}

impl From<&str> for ActionParam {
    fn from(value: &str) -> Self {
        ActionParam::Text(value.to_string())
    }
}

impl From<bool> for ActionParam {
    fn from(value: bool) -> Self {
        ActionParam::Flag(value)
    }
}

/// A notification action scheduled by an alert type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledAction {
    pub action_group: String,
    pub params: BTreeMap<String, ActionParam>,
}

impl ScheduledAction {
    pub fn new(action_group: impl Into<String>) -> Self {
        Self {
            action_group: action_group.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Into<ActionParam>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Payload value as text, if present and textual.
    pub fn text_param(&self, key: &str) -> Option<&str> {
        match self.params.get(key) {
            Some(ActionParam::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }
}

/// Fire-and-forget sink for scheduled actions.
///
/// Downstream notification channels consume the receiving half; a full or
/// closed channel drops the action with a warning rather than blocking the
/// evaluation tick.
#[derive(Clone)]
pub struct ActionDispatcher {
    tx: mpsc::Sender<ScheduledAction>,
}

impl ActionDispatcher {
    pub fn new(tx: mpsc::Sender<ScheduledAction>) -> Self {
        Self { tx }
    }

    /// Create a dispatcher together with its consuming end.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ScheduledAction>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Schedule one action. Never blocks and never fails the caller.
    pub fn schedule(&self, action: ScheduledAction) {
        debug!("Scheduling {} action", action.action_group);
        if let Err(e) = self.tx.try_send(action) {
            warn!("Dropping scheduled action: {}", e);
        }
    }
}
