//! Health report payload for `GET /health`.

use serde::Serialize;

/// Outcome of a health check.
///
/// The status lives in the body; the endpoint answers 200 either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthReport {
    Healthy {
        database: String,
        container: String,
        item_count: u64,
    },
    Unhealthy {
        reason: String,
    },
}

impl HealthReport {
    pub fn unhealthy(reason: impl Into<String>) -> Self {
        Self::Unhealthy {
            reason: reason.into(),
        }
    }
}
