use serde::{Deserialize, Serialize};

/// Thresholds for turning a stream of room estimates into location events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DwellConfig {
    /// A room must be observed continuously this long before it is recorded.
    pub dwell_secs: i64,

    /// Estimates below this confidence are treated like `unknown`.
    pub min_confidence: f64,
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self {
            dwell_secs: 60,
            min_confidence: 0.0,
        }
    }
}
