//! Engine Configuration

use crate::EngineError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seconds between evaluation ticks (default: 60)
    pub check_interval_secs: u64,
    /// Upper bound on records fetched per alert type per tick
    pub max_bucket_size: usize,
    /// Base index pattern for legacy alert records
    pub alerts_index_pattern: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 60,
            max_bucket_size: 10_000,
            alerts_index_pattern: ".monitoring-alerts-*".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from an optional TOML file layered with
    /// `CLUSTERWATCH_`-prefixed environment variables.
    pub fn load(path: &str) -> Result<Self, EngineError> {
        let defaults = Self::default();
        let cfg = config::Config::builder()
            .set_default("check_interval_secs", defaults.check_interval_secs)
            .map_err(|e| EngineError::Config(e.to_string()))?
            .set_default("max_bucket_size", defaults.max_bucket_size as u64)
            .map_err(|e| EngineError::Config(e.to_string()))?
            .set_default("alerts_index_pattern", defaults.alerts_index_pattern)
            .map_err(|e| EngineError::Config(e.to_string()))?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("CLUSTERWATCH"))
            .build()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        cfg.try_deserialize()
            .map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }
}
