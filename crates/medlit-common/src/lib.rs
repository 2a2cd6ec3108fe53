//! medlit-common: Shared types, errors, and the sandboxed HTTP client used across all medlit crates.

pub mod error;
pub mod entities;
pub mod sandbox;

pub use entities::{
    normalize_specialty, rank_journals, Article, Bookmark, EntrezCredentials, JournalRanking,
    MeshTerm, SearchHistoryEntry, SearchPage, NO_ABSTRACT,
};
pub use error::{ApiError, MedlitError, Result};
