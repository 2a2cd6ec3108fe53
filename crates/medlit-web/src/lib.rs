//! medlit-web: HTTP API for the medical literature explorer.
//!   - Journal rankings per specialty
//!   - PubMed search, downloads and citations
//!   - Saved MeSH terms, bookmarks, credentials and preferences

pub mod router;
pub mod handlers;
pub mod state;
pub mod extract;
