//! Search orchestration over an [`ArticleSource`].

use crate::demo::{demo_articles, EXAMPLE_JOURNALS};
use crate::query::{compose_query, journal_window_query, parse_date, DateRange, SearchParams, SortOrder};
use crate::sources::{ArticleSource, EsearchRequest};
use chrono::{NaiveDate, Utc};
use medlit_common::{Article, EntrezCredentials, MedlitError, Result, SearchPage};
use medlit_ranker::{ImpactFactorIndex, RankingService};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// PMIDs per efetch call.
pub const EFETCH_BATCH_SIZE: usize = 100;
pub const DEFAULT_MAX_DOWNLOAD_RESULTS: u32 = 5000;
pub const DEMO_ARTICLE_COUNT: usize = 10;

pub const MISSING_EMAIL_MESSAGE: &str = "Entrez email is not configured. Please set it in Settings.";

fn default_specialty() -> String {
    "Ophthalmology".to_string()
}
fn default_max_journals() -> u32 {
    5
}
fn default_max_articles() -> u32 {
    10
}
fn default_max_results() -> u32 {
    500
}

/// Body of `POST /api/search-articles`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleSearchRequest {
    #[serde(default = "default_specialty")]
    pub journal_specialty: String,
    #[serde(default)]
    pub selected_journals: Option<Vec<String>>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub mesh_terms: Option<Vec<String>>,
    #[serde(default)]
    pub use_demo_data: bool,
    #[serde(default = "default_max_journals")]
    pub max_journals_to_search: u32,
    #[serde(default = "default_max_articles")]
    pub max_articles_per_journal: u32,
}

impl ArticleSearchRequest {
    /// Check bounds and parse the date window.
    pub fn validate(&self) -> Result<(NaiveDate, NaiveDate)> {
        check_range("max_journals_to_search", self.max_journals_to_search, 1, 20)?;
        check_range("max_articles_per_journal", self.max_articles_per_journal, 1, 50)?;
        let start = parse_date(&self.start_date)?;
        let end = parse_date(&self.end_date)?;
        if start > end {
            return Err(MedlitError::InvalidInput("start_date is after end_date".to_string()));
        }
        Ok((start, end))
    }
}

/// Body of `POST /api/download-search-results`.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub journals: Vec<String>,
    #[serde(default)]
    pub mesh_terms: Option<Vec<String>>,
    #[serde(default)]
    pub filter_date_start: Option<String>,
    #[serde(default)]
    pub filter_date_end: Option<String>,
    pub format: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn check_range(name: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if value < min || value > max {
        return Err(MedlitError::InvalidInput(format!(
            "{} must be between {} and {}",
            name, min, max
        )));
    }
    Ok(())
}

pub fn require_email(creds: &EntrezCredentials) -> Result<()> {
    if creds.has_email() {
        Ok(())
    } else {
        Err(MedlitError::Config(MISSING_EMAIL_MESSAGE.to_string()))
    }
}

/// Keep articles sharing at least one MeSH heading with `terms` (case-insensitive).
pub fn filter_by_mesh(articles: Vec<Article>, terms: &[String]) -> Vec<Article> {
    let wanted: HashSet<String> = terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    if wanted.is_empty() {
        return articles;
    }
    articles
        .into_iter()
        .filter(|a| a.mesh_terms.iter().any(|m| wanted.contains(&m.trim().to_lowercase())))
        .collect()
}

pub fn annotate_impact_factors(articles: &mut [Article], index: &ImpactFactorIndex) {
    for article in articles {
        article.impact_factor = index.impact_factor(&article.journal);
    }
}

/// Newest first; dates are `YYYY-MM-DD` or free text, compared as strings.
fn sort_by_date_desc(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.publication_date.cmp(&a.publication_date));
}

pub struct SearchService {
    source: Arc<dyn ArticleSource>,
    max_download_results: u32,
}

impl SearchService {
    pub fn new(source: Arc<dyn ArticleSource>) -> Self {
        Self { source, max_download_results: DEFAULT_MAX_DOWNLOAD_RESULTS }
    }

    pub fn with_max_download_results(mut self, max: u32) -> Self {
        self.max_download_results = max.max(1);
        self
    }

    /// One page of results for an interactive search.
    #[instrument(skip(self, creds), fields(query = %params.query, page = params.page))]
    pub async fn search(&self, creds: &EntrezCredentials, params: &SearchParams) -> Result<SearchPage> {
        let term = compose_query(
            &params.query,
            &params.journals,
            &params.mesh_terms,
            &params.date_range,
            Utc::now().date_naive(),
        )?;

        let request = EsearchRequest::new(term, params.per_page)
            .starting_at(params.retstart())
            .sorted_by(params.sort.esearch_key());
        let found = self.source.esearch(creds, &request).await?;

        if found.ids.is_empty() {
            let mut page = SearchPage::empty(params.page, params.per_page);
            page.total = found.count;
            page.pages = found.count.div_ceil(params.per_page as u64);
            return Ok(page);
        }

        let ids: Vec<String> = found.ids.into_iter().take(params.per_page as usize).collect();
        let mut articles = self.source.efetch(creds, &ids).await?;
        articles.truncate(params.per_page as usize);
        if params.sort == SortOrder::Date {
            sort_by_date_desc(&mut articles);
        }

        let total = found.count.max(articles.len() as u64);
        info!(total, returned = articles.len(), "PubMed search complete");
        Ok(SearchPage {
            pages: total.div_ceil(params.per_page as u64),
            total,
            page: params.page,
            per_page: params.per_page,
            articles,
        })
    }

    /// Articles from each journal within a publication window, deduplicated.
    pub async fn search_journals(
        &self,
        creds: &EntrezCredentials,
        journals: &[String],
        start: NaiveDate,
        end: NaiveDate,
        per_journal: u32,
    ) -> Result<Vec<Article>> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();

        for journal in journals {
            let request = EsearchRequest::new(journal_window_query(journal, start, end), per_journal);
            let found = self.source.esearch(creds, &request).await?;
            info!(%journal, count = found.count, returned = found.ids.len(), "Journal window search");
            ids.extend(found.ids.into_iter().filter(|id| seen.insert(id.clone())));
        }

        self.fetch_batched(creds, &ids).await
    }

    /// Journal-window search across a specialty's top journals, filtered by
    /// MeSH headings and annotated with impact factors.
    ///
    /// `saved_mesh` is used when the request carries no terms of its own.
    #[instrument(skip_all, fields(specialty = %request.journal_specialty))]
    pub async fn search_articles(
        &self,
        creds: &EntrezCredentials,
        rankings: &RankingService,
        request: &ArticleSearchRequest,
        saved_mesh: Vec<String>,
    ) -> Result<Vec<Article>> {
        let (start, end) = request.validate()?;
        let mesh_terms = match &request.mesh_terms {
            Some(terms) if !terms.is_empty() => terms.clone(),
            _ => saved_mesh,
        };
        let selected: Vec<String> = request
            .selected_journals
            .iter()
            .flatten()
            .map(|j| j.trim().to_string())
            .filter(|j| !j.is_empty())
            .collect();
        let demo = request.use_demo_data || !creds.has_email();

        // Rankings are required only when they pick the journals to search.
        let journals_from_rankings = selected.is_empty() && !demo;
        let ranked = match rankings.get_rankings(&request.journal_specialty, false).await {
            Ok(r) => Some(r),
            Err(e) if !journals_from_rankings => {
                warn!(error = %e, "Rankings unavailable; impact factors will be estimated");
                None
            }
            Err(e) => return Err(e),
        };
        let index = ranked
            .as_ref()
            .map(|r| ImpactFactorIndex::new(&r.specialty, &r.rankings))
            .unwrap_or_else(|| ImpactFactorIndex::new(&request.journal_specialty, &[]));

        let journals = if !selected.is_empty() {
            selected
        } else {
            ranked
                .as_ref()
                .map(|r| r.top_journals(request.max_journals_to_search as usize))
                .unwrap_or_default()
        };

        let mut articles = if demo {
            if !request.use_demo_data {
                warn!("No Entrez email configured; returning demo articles");
            }
            let journals = if journals.is_empty() {
                EXAMPLE_JOURNALS.iter().map(|s| s.to_string()).collect()
            } else {
                journals
            };
            demo_articles(&journals, &mesh_terms, DEMO_ARTICLE_COUNT)
        } else {
            let found = self
                .search_journals(creds, &journals, start, end, request.max_articles_per_journal)
                .await?;
            let before = found.len();
            let kept = filter_by_mesh(found, &mesh_terms);
            info!(before, after = kept.len(), "MeSH filter applied");
            kept
        };

        annotate_impact_factors(&mut articles, &index);
        Ok(articles)
    }

    /// Everything matching a download request, up to `max_results`.
    #[instrument(skip_all, fields(query = %request.query, max = request.max_results))]
    pub async fn download(
        &self,
        creds: &EntrezCredentials,
        request: &DownloadRequest,
        saved_mesh: Vec<String>,
    ) -> Result<Vec<Article>> {
        check_range("max_results", request.max_results, 1, self.max_download_results)?;
        let range = DateRange::parse(request.filter_date_start.as_deref(), request.filter_date_end.as_deref())?;
        let mesh_terms = match &request.mesh_terms {
            Some(terms) if !terms.is_empty() => terms.clone(),
            _ => saved_mesh,
        };
        let term = compose_query(&request.query, &request.journals, &mesh_terms, &range, Utc::now().date_naive())?;
        require_email(creds)?;

        let esearch = EsearchRequest::new(term, request.max_results).sorted_by(SortOrder::Relevance.esearch_key());
        let found = self.source.esearch(creds, &esearch).await?;
        self.fetch_batched(creds, &found.ids).await
    }

    pub async fn fetch_article(&self, creds: &EntrezCredentials, pmid: &str) -> Result<Article> {
        let pmid = pmid.trim();
        if pmid.is_empty() {
            return Err(MedlitError::MissingIdentifier);
        }
        require_email(creds)?;

        self.source
            .efetch(creds, &[pmid.to_string()])
            .await?
            .into_iter()
            .find(|a| a.pubmed_id == pmid)
            .ok_or_else(|| MedlitError::NotFound(format!("Article {} not found in PubMed", pmid)))
    }

    async fn fetch_batched(&self, creds: &EntrezCredentials, ids: &[String]) -> Result<Vec<Article>> {
        let mut articles = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(EFETCH_BATCH_SIZE) {
            articles.extend(self.source.efetch(creds, chunk).await?);
        }
        Ok(articles)
    }
}
