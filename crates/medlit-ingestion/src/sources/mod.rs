//! Article source clients.

pub mod pubmed;

use async_trait::async_trait;
use medlit_common::{Article, EntrezCredentials, Result};

/// One esearch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EsearchRequest {
    pub term: String,
    pub retstart: u64,
    pub retmax: u32,
    /// Upstream sort key, e.g. `relevance` or `pub_date`.
    pub sort: Option<String>,
}

impl EsearchRequest {
    pub fn new(term: impl Into<String>, retmax: u32) -> Self {
        Self { term: term.into(), retstart: 0, retmax, sort: None }
    }

    pub fn starting_at(mut self, retstart: u64) -> Self {
        self.retstart = retstart;
        self
    }

    pub fn sorted_by(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EsearchResult {
    /// Total matches upstream, not just the ids returned.
    pub count: u64,
    pub ids: Vec<String>,
}

/// Common interface for article search backends.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Search and return matching ids plus the total hit count.
    async fn esearch(&self, creds: &EntrezCredentials, request: &EsearchRequest) -> Result<EsearchResult>;

    /// Fetch full records for `pmids`. Unknown ids are silently absent.
    async fn efetch(&self, creds: &EntrezCredentials, pmids: &[String]) -> Result<Vec<Article>>;
}
