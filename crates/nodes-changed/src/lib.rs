//! Nodes Changed Alert
//!
//! Fires when the backing store reports Elasticsearch nodes added to,
//! removed from, or restarted in a monitored cluster.

mod alert;

pub use alert::{NodesChangedAlert, ALERT_NODES_CHANGED, WATCH_NAME};
