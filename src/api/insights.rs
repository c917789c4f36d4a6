//! Daily insight endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::insights::{day_bounds, summarize_day, DailySummary, TransitionCount};
use crate::store::EventStore;
use crate::AppState;

use super::ApiError;

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    /// `YYYY-MM-DD`
    pub date: String,
}

async fn summary_for(state: &AppState, date: &str) -> Result<DailySummary, ApiError> {
    let (start_ts, end_ts) = day_bounds(date, &state.settings.insights)?;
    let events = state.db.query_by_date_range(start_ts, end_ts).await?;
    Ok(summarize_day(&events, date))
}

/// GET /insights/daily?date=YYYY-MM-DD
pub async fn daily_summary(
    State(state): State<AppState>,
    Query(query): Query<DailyQuery>,
) -> Result<Json<DailySummary>, ApiError> {
    Ok(Json(summary_for(&state, &query.date).await?))
}

/// GET /insights/daily/transitions?date=YYYY-MM-DD
///
/// Transitions of the day grouped by room pair.
pub async fn daily_transitions(
    State(state): State<AppState>,
    Query(query): Query<DailyQuery>,
) -> Result<Json<Vec<TransitionCount>>, ApiError> {
    let summary = summary_for(&state, &query.date).await?;
    Ok(Json(summary.transition_counts()))
}
