use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::store::{CentroidStore, RoomDirectory};

use super::classifier::{classify, BeaconReading, UNKNOWN};
use super::config::ClassifierConfig;

const ENABLE_LOGS: bool = false;

use crate::log_debug;

/// Room-level answer for a set of live readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomEstimate {
    pub room: String,
    pub confidence: f64,
    /// Winning beacon; `None` when the room is unknown.
    #[serde(skip)]
    pub beacon_id: Option<String>,
}

impl RoomEstimate {
    pub fn unknown() -> Self {
        Self {
            room: UNKNOWN.to_string(),
            confidence: 0.0,
            beacon_id: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.room == UNKNOWN
    }
}

/// Classifies readings against the stored centroids and resolves the winning
/// beacon to its room.
#[derive(Clone)]
pub struct Locator<S> {
    store: S,
    config: ClassifierConfig,
}

impl<S> Locator<S>
where
    S: CentroidStore + RoomDirectory,
{
    pub fn new(store: S, config: ClassifierConfig) -> Self {
        Self { store, config }
    }

    /// Store failures are errors. Everything else, including a beacon whose
    /// room binding has since disappeared, resolves to [`RoomEstimate::unknown`].
    pub async fn locate(&self, readings: &[BeaconReading]) -> Result<RoomEstimate> {
        if readings.is_empty() {
            return Ok(RoomEstimate::unknown());
        }

        let centroids = self.store.get_all().await?;
        let classification = classify(readings, &centroids, &self.config);
        if classification.is_unknown() {
            return Ok(RoomEstimate::unknown());
        }

        match self.store.room_for_beacon(&classification.beacon_id).await? {
            Some(room) => {
                log_debug!(
                    "{} readings -> {room} ({:.3})",
                    readings.len(),
                    classification.confidence
                );
                Ok(RoomEstimate {
                    room,
                    confidence: classification.confidence,
                    beacon_id: Some(classification.beacon_id),
                })
            }
            None => Ok(RoomEstimate::unknown()),
        }
    }
}
