//! Credentials, search history and preferences.

use axum::extract::State;
use axum::Json;
use medlit_common::{ApiError, EntrezCredentials, MedlitError};
use medlit_db::CredentialUpdate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::extract::{AppJson, AppQuery};
use crate::state::SharedState;

const DEFAULT_HISTORY_LIMIT: u32 = 10;
const MAX_HISTORY_LIMIT: u32 = 100;

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub entrez_email: String,
    pub pubmed_api_key: String,
}

impl From<EntrezCredentials> for ConfigResponse {
    fn from(creds: EntrezCredentials) -> Self {
        Self {
            pubmed_api_key: creds.api_key_str().unwrap_or_default().to_string(),
            entrez_email: creds.email.unwrap_or_default(),
        }
    }
}

/// GET /api/config
pub async fn get_config(State(state): State<SharedState>) -> Result<Json<ConfigResponse>, ApiError> {
    Ok(Json(state.entrez_credentials().await?.into()))
}

/// POST /api/config: fields left out keep their stored value.
pub async fn save_config(
    State(state): State<SharedState>,
    AppJson(update): AppJson<CredentialUpdate>,
) -> Result<Json<ConfigResponse>, ApiError> {
    let saved = state.credentials.save_credentials(&update).await?;
    Ok(Json(saved.into()))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

/// GET /api/search-history?limit=n
pub async fn search_history(
    State(state): State<SharedState>,
    AppQuery(params): AppQuery<HistoryParams>,
) -> Result<Json<Value>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT);
    let history = state.history.recent(limit).await?;
    Ok(Json(json!({ "status": "success", "history": history })))
}

/// GET /api/get-preferences
pub async fn get_preferences(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let preferences = state.preferences.all().await?;
    Ok(Json(json!({ "status": "success", "preferences": preferences })))
}

/// POST /api/save-preferences: body is a flat JSON object.
pub async fn save_preferences(
    State(state): State<SharedState>,
    AppJson(body): AppJson<Value>,
) -> Result<Json<Value>, ApiError> {
    let Value::Object(preferences) = body else {
        return Err(MedlitError::InvalidInput("Preferences must be a JSON object".to_string()).into());
    };
    save_all(&state, &preferences).await?;
    Ok(Json(json!({ "status": "success", "message": "Preferences saved" })))
}

async fn save_all(state: &SharedState, preferences: &Map<String, Value>) -> Result<(), ApiError> {
    for (key, value) in preferences {
        state.preferences.set(key, value).await?;
    }
    Ok(())
}
