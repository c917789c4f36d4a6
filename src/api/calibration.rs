//! Calibration upload and centroid fitting

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::db::models::CalibrationUpload;
use crate::AppState;

use super::ApiError;

#[derive(Debug, Serialize)]
pub struct CalibrationUploadResponse {
    pub ok: bool,
    pub beacon_id: String,
    pub room: String,
}

/// POST /calibration/upload
///
/// Replaces every stored sample for the beacon and binds it to the room.
pub async fn upload_calibration(
    State(state): State<AppState>,
    Json(upload): Json<CalibrationUpload>,
) -> Result<Json<CalibrationUploadResponse>, ApiError> {
    let room = state.calibration.upload(upload).await?;
    Ok(Json(CalibrationUploadResponse {
        ok: true,
        beacon_id: room.beacon_id,
        room: room.name,
    }))
}

/// POST /calibration/fit
///
/// Returns `beacon_id -> mean_rssi` for every beacon with samples.
pub async fn fit_centroids(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, f64>>, ApiError> {
    Ok(Json(state.calibration.fit().await?))
}
