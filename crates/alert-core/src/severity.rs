//! Alert Severity

use serde::{Deserialize, Serialize};

/// Normalized alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Success,
    Warning,
    Danger,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Success => "success",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Danger => "danger",
        }
    }
}

/// Map a legacy watch severity code to a normalized severity.
///
/// Legacy codes are bands of 1000 (1000 = low, 2000 = medium, 2100 = high).
/// Total over all inputs: unknown or negative codes never panic.
pub fn map_legacy_severity(code: i64) -> AlertSeverity {
    if code.div_euclid(1000) <= 1 {
        AlertSeverity::Warning
    } else {
        AlertSeverity::Danger
    }
}
