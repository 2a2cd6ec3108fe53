//! PubMed search, download and citation endpoints.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use chrono::Local;
use medlit_common::{ApiError, Article};
use medlit_db::history_label;
use medlit_export::{cite, export, CitationFormat, ExportFormat};
use medlit_ingestion::{require_email, ArticleSearchRequest, DateRange, DownloadRequest, SearchParams, SortOrder};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::attachment;
use crate::extract::{AppJson, AppQuery};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct PubmedSearchParams {
    pub query: Option<String>,
    /// Comma-separated journal names.
    pub journals: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort: Option<String>,
    pub filter_date_start: Option<String>,
    pub filter_date_end: Option<String>,
}

fn split_journals(journals: Option<&str>) -> Vec<String> {
    journals
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|j| !j.is_empty())
        .map(String::from)
        .collect()
}

/// GET /api/search-pubmed
///
/// The user's saved MeSH terms form the MeSH part of the query.
pub async fn search_pubmed(
    State(state): State<SharedState>,
    AppQuery(params): AppQuery<PubmedSearchParams>,
) -> Result<Json<Value>, ApiError> {
    let query = params.query.unwrap_or_default();
    let mesh_terms = state.saved_mesh_terms().await?;
    let range = DateRange::parse(params.filter_date_start.as_deref(), params.filter_date_end.as_deref())?;

    let search = SearchParams::new(query.clone())
        .journals(split_journals(params.journals.as_deref()))
        .mesh_terms(mesh_terms.clone())
        .date_range(range)
        .sort(SortOrder::parse(params.sort.as_deref()))
        .paginate(params.page.unwrap_or(1), params.per_page.unwrap_or(10));

    let creds = state.entrez_credentials().await?;
    let results = state.search.search(&creds, &search).await?;

    if let Some(label) = history_label(&query, &mesh_terms) {
        if let Err(e) = state.history.record(&label, results.total).await {
            warn!(error = %e, "Failed to record search history");
        }
    }

    Ok(Json(json!({ "status": "success", "results": results })))
}

/// POST /api/search-articles
pub async fn search_articles(
    State(state): State<SharedState>,
    AppJson(request): AppJson<ArticleSearchRequest>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let saved = state.saved_mesh_terms().await?;
    let creds = state.entrez_credentials().await?;
    let articles = state
        .search
        .search_articles(&creds, &state.rankings, &request, saved)
        .await?;
    info!(count = articles.len(), "search-articles complete");
    Ok(Json(articles))
}

/// POST /api/download-search-results
pub async fn download_search_results(
    State(state): State<SharedState>,
    AppJson(request): AppJson<DownloadRequest>,
) -> Result<Response, ApiError> {
    let format: ExportFormat = request.format.parse()?;
    let creds = state.entrez_credentials().await?;
    require_email(&creds)?;

    let saved = state.saved_mesh_terms().await?;
    let articles = state.search.download(&creds, &request, saved).await?;
    if articles.is_empty() {
        info!("No articles matched the download request");
    }

    let body = export(&articles, format)?;
    let filename = format.download_filename(&Local::now());
    info!(%format, count = articles.len(), %filename, "Prepared download");
    Ok(attachment(body, format.content_type(), &filename))
}

#[derive(Debug, Deserialize)]
pub struct CiteParams {
    pub format: Option<String>,
}

/// GET /api/cite-article/{pmid}?format=nbib|bibtex
pub async fn cite_article(
    State(state): State<SharedState>,
    Path(pmid): Path<String>,
    AppQuery(params): AppQuery<CiteParams>,
) -> Result<Response, ApiError> {
    let format = CitationFormat::parse(params.format.as_deref())?;
    let creds = state.entrez_credentials().await?;
    require_email(&creds)?;

    let article = state.search.fetch_article(&creds, &pmid).await?;
    let body = cite(&article, format);
    Ok(attachment(body, format.content_type(), &format.filename(&article.pubmed_id)))
}
