use axum::{extract::State, Json};
use serde::Serialize;

use crate::db::models::LocationEvent;
use crate::store::{EventStore, RoomDirectory};
use crate::AppState;

use super::ApiError;

#[derive(Debug, Serialize)]
pub struct LocationEventCreated {
    pub id: i64,
}

/// POST /events/location
///
/// Stores a confirmed dwell interval. The room must already be calibrated.
pub async fn create_location_event(
    State(state): State<AppState>,
    Json(event): Json<LocationEvent>,
) -> Result<Json<LocationEventCreated>, ApiError> {
    event.validate()?;

    if state.db.beacon_for_room(&event.room).await?.is_none() {
        return Err(ApiError::NotFound(format!(
            "Room '{}' not found. Calibrate beacon before logging events.",
            event.room
        )));
    }

    let id = state.db.append(&event).await?;
    Ok(Json(LocationEventCreated { id }))
}
