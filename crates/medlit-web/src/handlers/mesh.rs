//! Saved MeSH terms.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use medlit_common::{ApiError, MeshTerm};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::extract::AppJson;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct NewMeshTerm {
    #[serde(default)]
    pub term: String,
}

/// GET /api/mesh-terms
pub async fn list_terms(State(state): State<SharedState>) -> Result<Json<Vec<MeshTerm>>, ApiError> {
    Ok(Json(state.mesh_terms.list().await?))
}

/// POST /api/mesh-terms: 201 with the stored term, 409 on a duplicate.
pub async fn add_term(
    State(state): State<SharedState>,
    AppJson(body): AppJson<NewMeshTerm>,
) -> Result<(StatusCode, Json<MeshTerm>), ApiError> {
    let term = state.mesh_terms.add(&body.term).await?;
    Ok((StatusCode::CREATED, Json(term)))
}

/// DELETE /api/mesh-terms/{id}
pub async fn delete_term(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.mesh_terms.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/mesh-terms/defaults
pub async fn seed_defaults(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let inserted = state.mesh_terms.seed_defaults().await?;
    Ok(Json(json!({ "status": "success", "inserted": inserted })))
}
