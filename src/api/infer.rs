//! Live room inference

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::models::{validate_timestamp, LocationEvent};
use crate::inference::{BeaconReading, RoomEstimate, UNKNOWN};
use crate::recorder::Dwell;
use crate::store::{EventStore, RoomDirectory};
use crate::AppState;

use super::ApiError;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

#[derive(Debug, Deserialize)]
pub struct FeatureVector {
    #[serde(default)]
    pub readings: Vec<BeaconReading>,
}

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    #[serde(default)]
    pub readings: Vec<BeaconReading>,
    /// Unix seconds of the scan; defaults to now.
    pub timestamp: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub room: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<LocationEvent>,
}

/// POST /infer
///
/// Always answers with a room or `unknown`; only store failures are errors.
pub async fn infer_room(
    State(state): State<AppState>,
    Json(body): Json<FeatureVector>,
) -> Result<Json<RoomEstimate>, ApiError> {
    Ok(Json(state.locator.locate(&body.readings).await?))
}

/// POST /infer/track
///
/// Classifies like `/infer`, then feeds the estimate to the dwell tracker.
/// When that closes a stable run, the run is stored under the beacon's
/// current room name and returned as `event`. A dwell that cannot be stored
/// is logged and dropped; the estimate is still returned.
pub async fn track_room(
    State(state): State<AppState>,
    Json(body): Json<TrackRequest>,
) -> Result<Json<TrackResponse>, ApiError> {
    let ts = body.timestamp.unwrap_or_else(|| Utc::now().timestamp());
    validate_timestamp(ts)?;

    let estimate = state.locator.locate(&body.readings).await?;

    let finished = {
        let mut tracker = state.tracker.lock().await;
        let beacon_id = estimate.beacon_id.as_deref().unwrap_or(UNKNOWN);
        tracker.observe(beacon_id, estimate.confidence, ts)
    };

    let event = match finished {
        Some(dwell) => record_dwell(&state, dwell).await,
        None => None,
    };

    Ok(Json(TrackResponse {
        room: estimate.room,
        confidence: estimate.confidence,
        event,
    }))
}

async fn record_dwell(state: &AppState, dwell: Dwell) -> Option<LocationEvent> {
    let room = match state.db.room_for_beacon(&dwell.beacon_id).await {
        Ok(Some(room)) => room,
        Ok(None) => {
            log_warn!(
                "dropping {}s dwell: beacon {} is no longer bound to a room",
                dwell.duration_secs(),
                dwell.beacon_id
            );
            return None;
        }
        Err(err) => {
            log_error!("dropping dwell for beacon {}: {err:#}", dwell.beacon_id);
            return None;
        }
    };

    let mut event = dwell.into_event(room);
    match state.db.append(&event).await {
        Ok(id) => {
            event.id = Some(id);
            log_info!(
                "recorded {}s in {} (confidence {:.2})",
                event.duration_secs(),
                event.room,
                event.confidence
            );
            Some(event)
        }
        Err(err) => {
            log_error!("dropping dwell event for {}: {err:#}", event.room);
            None
        }
    }
}
