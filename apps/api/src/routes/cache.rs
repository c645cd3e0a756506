use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::cache::CacheStats;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClearParams {
    pub pattern: Option<String>,
}

/// GET /api/cache/stats
pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats().await)
}

/// DELETE /api/cache?pattern=summary:*
pub async fn clear_cache(
    State(state): State<AppState>,
    Query(params): Query<ClearParams>,
) -> Result<Json<Value>, AppError> {
    let pattern = params
        .pattern
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| "*".to_string());

    let removed = state
        .cache
        .clear(&pattern)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Cache clear failed: {e}")))?;

    Ok(Json(json!({
        "pattern": pattern,
        "removed": removed,
    })))
}
