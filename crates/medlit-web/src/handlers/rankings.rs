//! Journal ranking endpoints.

use axum::extract::{Path, State};
use axum::Json;
use medlit_common::{ApiError, JournalRanking};
use medlit_ranker::{RankingOrigin, Rankings};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::extract::AppQuery;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct RankingRow {
    pub journal_name: String,
    pub impact_factor: f64,
    pub rank: u32,
}

impl From<&JournalRanking> for RankingRow {
    fn from(r: &JournalRanking) -> Self {
        Self {
            journal_name: r.journal_name.clone(),
            impact_factor: r.impact_factor,
            rank: r.rank,
        }
    }
}

fn rows(rankings: &Rankings) -> Vec<RankingRow> {
    rankings.rankings.iter().map(RankingRow::from).collect()
}

#[derive(Debug, Deserialize)]
pub struct RankingParams {
    #[serde(default)]
    pub refresh: bool,
}

/// GET /api/available-specialties
pub async fn available_specialties(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "success",
        "specialties": state.rankings.available_specialties().await,
    }))
}

/// GET /api/journal-rankings/{specialty}?refresh=bool
pub async fn journal_rankings(
    State(state): State<SharedState>,
    Path(specialty): Path<String>,
    AppQuery(params): AppQuery<RankingParams>,
) -> Result<Json<Value>, ApiError> {
    let rankings = state.rankings.get_rankings(&specialty, params.refresh).await?;

    let mut body = json!({
        "status": "success",
        "specialty": rankings.specialty,
        "source": rankings.origin,
        "data": rows(&rankings),
    });
    if let Some(message) = rankings.message() {
        body["message"] = Value::String(message);
    }
    Ok(Json(body))
}

/// GET /api/rankings/{specialty}
pub async fn rankings(
    State(state): State<SharedState>,
    Path(specialty): Path<String>,
) -> Result<Json<Vec<RankingRow>>, ApiError> {
    let rankings = state.rankings.get_rankings(&specialty, false).await?;
    Ok(Json(rows(&rankings)))
}

/// POST /api/rankings/{specialty}/refresh
pub async fn refresh_rankings(
    State(state): State<SharedState>,
    Path(specialty): Path<String>,
) -> Result<Json<Vec<RankingRow>>, ApiError> {
    let rankings = state.rankings.get_rankings(&specialty, true).await?;
    if rankings.origin != RankingOrigin::Live {
        tracing::warn!(specialty = %rankings.specialty, origin = ?rankings.origin, "Refresh served degraded data");
    }
    Ok(Json(rows(&rankings)))
}
