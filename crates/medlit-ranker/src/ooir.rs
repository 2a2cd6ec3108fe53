//! OOIR journal-ranking scraper.
//!
//! Fetches `journals.php?field=Clinical+Medicine&category=<specialty>&metric=jif`
//! and extracts the ranking table. The page layout is not under our control, so
//! the parser looks for the table by its header labels rather than by id.

use async_trait::async_trait;
use medlit_common::sandbox::SandboxClient;
use medlit_common::{rank_journals, JournalRanking, MedlitError};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const DEFAULT_OOIR_URL: &str = "https://ooir.org";

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network failure, timeout, or a non-success HTTP status.
    #[error("Ranking source unreachable: {0}")]
    Unreachable(String),

    /// The page loaded but held no parseable ranking table.
    #[error("No rankings found for {0}")]
    NoRankings(String),
}

impl From<ScrapeError> for MedlitError {
    fn from(err: ScrapeError) -> Self {
        match err {
            ScrapeError::Unreachable(msg) => MedlitError::UpstreamUnavailable(msg),
            ScrapeError::NoRankings(specialty) => {
                MedlitError::NotFound(format!("No journal rankings found for {}", specialty))
            }
        }
    }
}

/// Anything that can produce a ranking list for a specialty.
#[async_trait]
pub trait RankingSource: Send + Sync {
    async fn fetch_rankings(&self, specialty: &str) -> Result<Vec<JournalRanking>, ScrapeError>;
}

pub struct OoirScraper {
    client: SandboxClient,
    base_url: String,
    delay: Duration,
}

impl OoirScraper {
    pub fn new(base_url: &str, timeout: Duration, delay: Duration) -> Result<Self, MedlitError> {
        let mut client = SandboxClient::with_timeout(timeout)?;
        client.allow_url_host(base_url)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            delay,
        })
    }

    pub fn ranking_url(&self, specialty: &str) -> Result<Url, MedlitError> {
        let mut url = Url::parse(&format!("{}/journals.php", self.base_url))
            .map_err(|e| MedlitError::Config(format!("Invalid rankings base URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("field", "Clinical Medicine")
            .append_pair("category", specialty)
            .append_pair("metric", "jif");
        Ok(url)
    }
}

#[async_trait]
impl RankingSource for OoirScraper {
    #[instrument(skip(self))]
    async fn fetch_rankings(&self, specialty: &str) -> Result<Vec<JournalRanking>, ScrapeError> {
        let url = self
            .ranking_url(specialty)
            .map_err(|e| ScrapeError::Unreachable(e.to_string()))?;

        // Polite delay before every request to the ranking site.
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        info!(%url, "Fetching live journal rankings");
        let request = self
            .client
            .get(url.as_str())
            .map_err(|e| ScrapeError::Unreachable(e.to_string()))?
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9");

        let resp = request
            .send()
            .await
            .map_err(|e| ScrapeError::Unreachable(format!("{}: {}", url, e)))?;

        if !resp.status().is_success() {
            warn!(status = %resp.status(), "Ranking page returned an error status");
            return Err(ScrapeError::Unreachable(format!("{} returned {}", url, resp.status())));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ScrapeError::Unreachable(format!("reading {}: {}", url, e)))?;

        let rankings = parse_rankings(&body, specialty)?;
        info!(count = rankings.len(), "Scraped journal rankings");
        Ok(rankings)
    }
}

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static TH: LazyLock<Selector> = LazyLock::new(|| selector("th"));
static TD: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));

static CA_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ca\.?\s*(\d+\.?\d*)").expect("static regex"));
static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.]").expect("static regex"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Extract a ranked list from an OOIR journals page.
///
/// The ranking table is the first `<table>` whose header row contains `rank`,
/// `journal` and `impact factor` cells. Rows with fewer than three cells are
/// skipped.
pub fn parse_rankings(html: &str, specialty: &str) -> Result<Vec<JournalRanking>, ScrapeError> {
    let document = Html::parse_document(html);

    let Some(table) = document.select(&TABLE).find(|t| is_ranking_table(*t)) else {
        warn!(specialty, "No journal ranking table on page");
        return Err(ScrapeError::NoRankings(specialty.to_string()));
    };

    let mut journals = Vec::new();
    for row in table.select(&ROW).skip(1) {
        let cells: Vec<ElementRef> = row.select(&TD).collect();
        if cells.len() < 3 {
            continue;
        }
        let name = cells[1]
            .select(&ANCHOR)
            .next()
            .map(element_text)
            .unwrap_or_else(|| element_text(cells[1]));
        if name.is_empty() {
            continue;
        }
        let impact = parse_impact_factor(&element_text(cells[2]));
        debug!(journal = %name, impact, "Parsed ranking row");
        journals.push((name, impact));
    }

    if journals.is_empty() {
        warn!(specialty, "Ranking table had no journal rows");
        return Err(ScrapeError::NoRankings(specialty.to_string()));
    }

    Ok(rank_journals(specialty, journals))
}

fn is_ranking_table(table: ElementRef) -> bool {
    let Some(header) = table.select(&ROW).next() else {
        return false;
    };
    let labels: Vec<String> = header.select(&TH).map(|th| element_text(th).to_lowercase()).collect();
    ["rank", "journal", "impact factor"]
        .iter()
        .all(|want| labels.iter().any(|l| l == want))
}

/// Whitespace-normalised text content of an element.
fn element_text(el: ElementRef) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// OOIR shows values like `ca.36.4`; anything unparseable counts as 0.0.
pub fn parse_impact_factor(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() || text == "-" {
        return 0.0;
    }
    if let Some(caps) = CA_PREFIX.captures(text) {
        return caps[1].parse().unwrap_or(0.0);
    }
    NON_NUMERIC.replace_all(text, "").parse().unwrap_or(0.0)
}
