use serde::{Deserialize, Serialize};

/// Tunables for the nearest-centroid classifier. Defaults are the calibrated
/// values; changing them changes every confidence the service reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// dBm distance over which confidence decays by a factor of e.
    pub decay_scale: f64,

    /// dBm margin between best and runner-up that earns the full boost.
    pub margin_scale: f64,

    /// Upper bound on the margin boost (1.0 caps the multiplier at 2x).
    pub max_margin_boost: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            decay_scale: 10.0,
            margin_scale: 10.0,
            max_margin_boost: 1.0,
        }
    }
}
