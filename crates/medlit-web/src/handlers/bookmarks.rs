use axum::extract::{Path, State};
use axum::Json;
use medlit_common::{ApiError, Bookmark};
use serde_json::{json, Value};

use crate::extract::AppJson;
use crate::state::SharedState;

/// POST /api/bookmark-article
pub async fn bookmark_article(
    State(state): State<SharedState>,
    AppJson(bookmark): AppJson<Bookmark>,
) -> Result<Json<Value>, ApiError> {
    state.bookmarks.upsert(&bookmark).await?;
    Ok(Json(json!({ "status": "success", "message": "Article bookmarked" })))
}

/// GET /api/bookmarked-articles
pub async fn bookmarked_articles(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let bookmarks = state.bookmarks.list().await?;
    Ok(Json(json!({ "status": "success", "bookmarks": bookmarks })))
}

/// DELETE /api/bookmark-article/{pmid}
pub async fn remove_bookmark(
    State(state): State<SharedState>,
    Path(pmid): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.bookmarks.remove(&pmid).await?;
    Ok(Json(json!({ "status": "success", "message": "Bookmark removed" })))
}
