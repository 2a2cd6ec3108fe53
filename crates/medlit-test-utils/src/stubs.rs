//! In-process stand-ins for the ranking site and PubMed.

use async_trait::async_trait;
use medlit_common::{rank_journals, Article, EntrezCredentials, JournalRanking, MedlitError, Result};
use medlit_ingestion::{ArticleSource, EsearchRequest, EsearchResult};
use medlit_ranker::{RankingSource, ScrapeError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Outcome {
    Rankings(Vec<JournalRanking>),
    Unreachable,
}

/// Ranking source with per-specialty canned outcomes.
///
/// Specialties without an outcome behave like a page with no ranking table.
#[derive(Debug, Default)]
pub struct StubRankingSource {
    outcomes: Mutex<HashMap<String, Outcome>>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl StubRankingSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rankings(self, specialty: &str, journals: &[(&str, f64)]) -> Self {
        self.set_rankings(specialty, journals);
        self
    }

    pub fn set_rankings(&self, specialty: &str, journals: &[(&str, f64)]) {
        let list = rank_journals(specialty, journals.iter().map(|(n, f)| (n.to_string(), *f)));
        self.lock().insert(specialty.to_string(), Outcome::Rankings(list));
    }

    pub fn set_unreachable(&self, specialty: &str) {
        self.lock().insert(specialty.to_string(), Outcome::Unreachable);
    }

    /// Make every fetch fail as if the site were down.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Outcome>> {
        self.outcomes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl RankingSource for StubRankingSource {
    async fn fetch_rankings(&self, specialty: &str) -> std::result::Result<Vec<JournalRanking>, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(ScrapeError::Unreachable("stub offline".to_string()));
        }
        match self.lock().get(specialty).cloned() {
            Some(Outcome::Rankings(list)) => Ok(list),
            Some(Outcome::Unreachable) => Err(ScrapeError::Unreachable(format!("stub: {}", specialty))),
            None => Err(ScrapeError::NoRankings(specialty.to_string())),
        }
    }
}

/// Article source over a fixed corpus. esearch returns corpus ids in order,
/// windowed by retstart/retmax; efetch returns the matching records.
#[derive(Debug, Default)]
pub struct StubArticleSource {
    corpus: Vec<Article>,
    total: Option<u64>,
    failing: AtomicBool,
    searches: Mutex<Vec<EsearchRequest>>,
    fetches: Mutex<Vec<Vec<String>>>,
}

impl StubArticleSource {
    pub fn new(corpus: Vec<Article>) -> Self {
        Self { corpus, ..Default::default() }
    }

    /// Report `total` as the upstream match count instead of the corpus size.
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn searches(&self) -> Vec<EsearchRequest> {
        self.searches.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn fetches(&self) -> Vec<Vec<String>> {
        self.fetches.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn check_up(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MedlitError::UpstreamUnavailable("stub PubMed is down".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ArticleSource for StubArticleSource {
    async fn esearch(&self, _creds: &EntrezCredentials, request: &EsearchRequest) -> Result<EsearchResult> {
        self.searches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        self.check_up()?;

        let ids = self
            .corpus
            .iter()
            .skip(request.retstart as usize)
            .take(request.retmax as usize)
            .map(|a| a.pubmed_id.clone())
            .collect();
        Ok(EsearchResult {
            count: self.total.unwrap_or(self.corpus.len() as u64),
            ids,
        })
    }

    async fn efetch(&self, _creds: &EntrezCredentials, pmids: &[String]) -> Result<Vec<Article>> {
        self.fetches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(pmids.to_vec());
        self.check_up()?;

        Ok(pmids
            .iter()
            .filter_map(|id| self.corpus.iter().find(|a| &a.pubmed_id == id).cloned())
            .collect())
    }
}
