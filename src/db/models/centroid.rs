use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fitted fingerprint for a room's beacon: the mean of all its samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub beacon_id: String,
    pub room: String,
    pub mean_rssi: f64,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}
