use axum::{extract::State, Json};

use crate::db::models::Centroid;
use crate::store::CentroidStore;
use crate::AppState;

use super::ApiError;

/// GET /centroids
pub async fn list_centroids(
    State(state): State<AppState>,
) -> Result<Json<Vec<Centroid>>, ApiError> {
    Ok(Json(state.db.list_centroids().await?))
}
