use axum::{extract::State, Json};

use crate::db::models::Room;
use crate::store::RoomDirectory;
use crate::AppState;

use super::ApiError;

/// GET /rooms
pub async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<Room>>, ApiError> {
    Ok(Json(state.db.list_rooms().await?))
}
