//! medlit-ingestion: Literature search.
//! - PubMed E-utilities client (esearch / efetch)
//! - Query composition and pagination
//! - Journal-window search with MeSH filtering and impact-factor annotation
//! - Deterministic demo articles

pub mod sources;
pub mod query;
pub mod search;
pub mod demo;

pub use demo::demo_articles;
pub use query::{compose_query, journal_window_query, parse_date, DateRange, SearchParams, SortOrder};
pub use search::{
    filter_by_mesh, require_email, ArticleSearchRequest, DownloadRequest, SearchService,
    MISSING_EMAIL_MESSAGE,
};
pub use sources::pubmed::{parse_pubmed_xml, PubMedClient, DEFAULT_EUTILS_URL};
pub use sources::{ArticleSource, EsearchRequest, EsearchResult};
