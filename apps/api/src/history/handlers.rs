use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::history::store::DEFAULT_HISTORY_LIMIT;
use crate::models::history::{HistoryPoint, QuickStats};
use crate::state::AppState;

/// Upper bound on `limit` for the history series.
const MAX_HISTORY_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub id: i64,
    pub suggestions: Vec<String>,
}

/// GET /api/v1/dashboard/stats
pub async fn handle_quick_stats(
    State(state): State<AppState>,
) -> Result<Json<QuickStats>, AppError> {
    Ok(Json(state.history.get_quick_stats().await?))
}

/// GET /api/v1/dashboard/history?limit=N
pub async fn handle_recent_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryPoint>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_HISTORY_LIMIT}"
        )));
    }
    Ok(Json(state.history.get_recent_history(limit).await?))
}

/// GET /api/v1/analyses/:id/suggestions
pub async fn handle_get_suggestions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let suggestions = state.history.get_suggestions(id).await?;
    Ok(Json(SuggestionsResponse { id, suggestions }))
}
