//! Shared application state for the web server.

use medlit_common::{EntrezCredentials, Result};
use medlit_config::Config;
use medlit_db::{
    BookmarkRepository, CredentialRepository, Database, MeshTermRepository, PreferenceRepository,
    SearchHistoryRepository,
};
use medlit_ingestion::{ArticleSource, PubMedClient, SearchService};
use medlit_ranker::{OoirScraper, RankingCache, RankingService, RankingSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub db: Arc<Database>,
    pub mesh_terms: MeshTermRepository,
    pub bookmarks: BookmarkRepository,
    pub credentials: CredentialRepository,
    pub history: SearchHistoryRepository,
    pub preferences: PreferenceRepository,
    pub rankings: RankingService,
    pub search: SearchService,
    /// Frontend assets; served under `/static`, with `index.html` at `/`.
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        ranking_source: Arc<dyn RankingSource>,
        ranking_cache: Arc<RankingCache>,
        article_source: Arc<dyn ArticleSource>,
    ) -> Self {
        Self {
            mesh_terms: MeshTermRepository::new(db.clone()),
            bookmarks: BookmarkRepository::new(db.clone()),
            credentials: CredentialRepository::new(db.clone()),
            history: SearchHistoryRepository::new(db.clone()),
            preferences: PreferenceRepository::new(db.clone()),
            rankings: RankingService::new(ranking_source, ranking_cache),
            search: SearchService::new(article_source),
            static_dir: None,
            db,
        }
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    pub fn with_max_download_results(mut self, max: u32) -> Self {
        self.search = self.search.with_max_download_results(max);
        self
    }

    /// Connect the database and live upstream clients described by `config`.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let db = Database::connect(&config.database.url, config.database.max_connections).await?;
        db.initialize().await?;
        info!(url = %config.database.url, "Database ready");

        let scraper = OoirScraper::new(
            &config.rankings.base_url,
            Duration::from_secs(config.rankings.timeout_secs),
            Duration::from_millis(config.rankings.request_delay_ms),
        )?;
        let cache = RankingCache::with_system_clock(Duration::from_secs(config.rankings.ttl_secs));
        let pubmed = PubMedClient::new(&config.pubmed.base_url, &config.pubmed.tool)?;

        Ok(Self::new(Arc::new(db), Arc::new(scraper), Arc::new(cache), Arc::new(pubmed))
            .with_static_dir(&config.server.static_dir)
            .with_max_download_results(config.pubmed.max_download_results))
    }

    pub async fn entrez_credentials(&self) -> Result<EntrezCredentials> {
        Ok(self.credentials.get_credentials().await?)
    }

    pub async fn saved_mesh_terms(&self) -> Result<Vec<String>> {
        Ok(self.mesh_terms.list_terms().await?)
    }
}

pub type SharedState = Arc<AppState>;
