//! Health, cache and housekeeping endpoints.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use medlit_common::{ApiError, MedlitError};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::extract::AppQuery;
use crate::state::SharedState;

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /api/available-dates: rankings are always fetched live.
pub async fn available_dates() -> Json<Value> {
    Json(json!({ "status": "success", "dates": ["latest"] }))
}

#[derive(Debug, Deserialize)]
pub struct ClearCacheParams {
    pub cache_type: Option<String>,
}

/// POST /api/clear-cache?cache_type=rankings|all
pub async fn clear_cache(
    State(state): State<SharedState>,
    AppQuery(params): AppQuery<ClearCacheParams>,
) -> Result<Json<Value>, ApiError> {
    let cache_type = params.cache_type.unwrap_or_else(|| "all".to_string()).to_lowercase();
    if cache_type != "rankings" && cache_type != "all" {
        return Err(MedlitError::InvalidInput(format!("Unknown cache type '{}'", cache_type)).into());
    }

    let cleared = state.rankings.cache().clear().await;
    info!(%cache_type, cleared, "Cleared ranking cache");
    Ok(Json(json!({
        "status": "success",
        "message": format!("Cache cleared: {}", cache_type),
        "cleared": cleared,
    })))
}

/// GET /api/stats
pub async fn stats(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let stats = state.db.stats().await?;
    Ok(Json(json!({
        "status": "success",
        "mesh_terms": stats.mesh_terms,
        "bookmarks": stats.bookmarks,
        "search_history": stats.search_history,
        "cached_specialties": state.rankings.cache().cached_specialties().await,
    })))
}
