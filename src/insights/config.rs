use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    /// Seconds east of UTC at which a calendar day starts. A date `D` covers
    /// `[midnight(D) - utc_offset_secs, + 86400)` in Unix seconds.
    pub utc_offset_secs: i32,
}
