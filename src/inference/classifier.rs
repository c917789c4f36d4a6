use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::config::ClassifierConfig;

/// Sentinel returned when no room can be inferred.
pub const UNKNOWN: &str = "unknown";

/// One live observation of a beacon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeaconReading {
    pub beacon_id: String,
    #[serde(alias = "signal_strength")]
    pub rssi: f64,
}

impl BeaconReading {
    pub fn new(beacon_id: impl Into<String>, rssi: f64) -> Self {
        Self {
            beacon_id: beacon_id.into(),
            rssi,
        }
    }
}

/// Best-matching beacon and a confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub beacon_id: String,
    pub confidence: f64,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            beacon_id: UNKNOWN.to_string(),
            confidence: 0.0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.beacon_id == UNKNOWN
    }
}

/// Nearest-centroid classification in one-dimensional signal space.
///
/// Every reading with a known centroid is scored by `|rssi - centroid|`;
/// readings for other beacons are ignored. The closest beacon wins, ties
/// going to the earlier reading. Confidence is `exp(-d / decay_scale)`,
/// boosted by the margin to the runner-up when there is one, and clamped to
/// `[0, 1]`. No usable input yields [`Classification::unknown`], never an
/// error.
pub fn classify(
    readings: &[BeaconReading],
    centroids: &BTreeMap<String, f64>,
    config: &ClassifierConfig,
) -> Classification {
    if centroids.is_empty() || readings.is_empty() {
        return Classification::unknown();
    }

    let distances = rank_by_distance(readings, centroids);
    let Some((best_beacon, best_distance)) = distances.first() else {
        return Classification::unknown();
    };

    let runner_up = distances.get(1).map(|(_, distance)| *distance);

    Classification {
        beacon_id: (*best_beacon).to_string(),
        confidence: confidence(*best_distance, runner_up, config),
    }
}

/// Matched `(beacon_id, distance)` pairs, closest first. The sort is stable so
/// equal distances keep reading order.
fn rank_by_distance<'a>(
    readings: &'a [BeaconReading],
    centroids: &BTreeMap<String, f64>,
) -> Vec<(&'a str, f64)> {
    let mut distances: Vec<(&str, f64)> = readings
        .iter()
        .filter_map(|reading| {
            let centroid = centroids.get(&reading.beacon_id)?;
            let distance = (reading.rssi - centroid).abs();
            distance
                .is_finite()
                .then_some((reading.beacon_id.as_str(), distance))
        })
        .collect();

    distances.sort_by(|a, b| a.1.total_cmp(&b.1));
    distances
}

fn confidence(best: f64, runner_up: Option<f64>, config: &ClassifierConfig) -> f64 {
    let base = (-best / config.decay_scale).exp();
    let raw = match runner_up {
        None => base,
        Some(second) => {
            let margin = second - best;
            let margin_factor = 1.0 + (margin / config.margin_scale).min(config.max_margin_boost);
            base * margin_factor
        }
    };
    raw.clamp(0.0, 1.0)
}
