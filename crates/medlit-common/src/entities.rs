//! Core entity types shared by the stores, the search pipeline and the HTTP layer.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};

pub const NO_ABSTRACT: &str = "No abstract available.";

// ---------------------------------------------------------------------------
// Journal rankings
// ---------------------------------------------------------------------------

/// One journal's position within a specialty's ranking list.
///
/// Lists are only built through [`rank_journals`], so `rank` always reflects
/// the position after sorting by descending impact factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalRanking {
    pub specialty: String,
    pub journal_name: String,
    pub impact_factor: f64,
    pub rank: u32,
}

/// Sort `(journal_name, impact_factor)` pairs by descending impact factor and
/// assign 1-based ranks.
pub fn rank_journals<I, S>(specialty: &str, journals: I) -> Vec<JournalRanking>
where
    I: IntoIterator<Item = (S, f64)>,
    S: Into<String>,
{
    let mut pairs: Vec<(String, f64)> = journals
        .into_iter()
        .map(|(name, impact)| (name.into(), impact))
        .collect();

    // Stable sort keeps source order among equal impact factors.
    pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    pairs
        .into_iter()
        .enumerate()
        .map(|(i, (journal_name, impact_factor))| JournalRanking {
            specialty: specialty.to_string(),
            journal_name,
            impact_factor,
            rank: i as u32 + 1,
        })
        .collect()
}

/// Title-case every whitespace-separated word: `"clinical  neurology"` → `"Clinical Neurology"`.
pub fn normalize_specialty(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub pubmed_id: String,
    pub title: String,
    pub journal: String,
    pub publication_date: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub mesh_terms: Vec<String>,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub impact_factor: f64,
}

impl Article {
    pub fn pubmed_url(pmid: &str) -> String {
        format!("https://pubmed.ncbi.nlm.nih.gov/{}/", pmid)
    }

    pub fn has_abstract(&self) -> bool {
        !self.abstract_text.trim().is_empty()
            && !self.abstract_text.trim().eq_ignore_ascii_case(NO_ABSTRACT)
    }
}

/// One page of search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    pub articles: Vec<Article>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub pages: u64,
}

impl SearchPage {
    pub fn empty(page: u32, per_page: u32) -> Self {
        Self { articles: vec![], total: 0, page, per_page, pages: 0 }
    }
}

// ---------------------------------------------------------------------------
// User data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshTerm {
    pub id: String,
    pub term: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(default, deserialize_with = "pmid_text")]
    pub pmid: String,
    #[serde(default)]
    pub title: String,
    /// Comma-separated; a JSON list of names is joined on the way in.
    #[serde(default, deserialize_with = "authors_text")]
    pub authors: String,
    #[serde(default)]
    pub journal: String,
    #[serde(default)]
    pub pub_date: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PmidValue {
    Text(String),
    Number(u64),
}

/// Clients send PMIDs both as strings and as bare numbers.
fn pmid_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<PmidValue>::deserialize(deserializer)? {
        Some(PmidValue::Text(s)) => s,
        Some(PmidValue::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AuthorsValue {
    Text(String),
    List(Vec<String>),
}

fn authors_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<AuthorsValue>::deserialize(deserializer)? {
        Some(AuthorsValue::Text(s)) => s,
        Some(AuthorsValue::List(names)) => names.join(", "),
        None => String::new(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub id: i64,
    pub query: String,
    pub result_count: u64,
    pub timestamp: DateTime<Utc>,
}

/// Credentials sent with every Entrez request.
#[derive(Debug, Clone, Default)]
pub struct EntrezCredentials {
    pub email: Option<String>,
    pub api_key: Option<SecretString>,
}

impl EntrezCredentials {
    pub fn new(email: impl Into<String>, api_key: Option<&str>) -> Self {
        let email = email.into();
        Self {
            email: (!email.trim().is_empty()).then(|| email.trim().to_string()),
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(|k| SecretString::from(k.to_string())),
        }
    }

    pub fn has_email(&self) -> bool {
        self.email.is_some()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn api_key_str(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret())
    }
}
