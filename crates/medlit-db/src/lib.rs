//! medlit database layer
//!
//! SQLite storage (through sqlx) for the user's MeSH terms, bookmarks,
//! Entrez credentials, search history and preferences.
//!
//! # Example
//!
//! ```rust,no_run
//! use medlit_db::{Database, MeshTermRepository};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite://medlit.db", 5).await?;
//!     db.initialize().await?;
//!
//!     let terms = MeshTermRepository::new(Arc::new(db));
//!     terms.seed_defaults_if_empty().await?;
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod schema;
pub mod mesh_terms;
pub mod bookmarks;
pub mod credentials;
pub mod history;
pub mod preferences;

pub use database::{Database, DatabaseStats};
pub use error::{DbError, Result};
pub use schema::DEFAULT_MESH_TERMS;
pub use mesh_terms::MeshTermRepository;
pub use bookmarks::BookmarkRepository;
pub use credentials::{CredentialRepository, CredentialUpdate, API_KEY_PLACEHOLDER};
pub use history::{history_label, SearchHistoryRepository};
pub use preferences::{PreferenceRepository, KNOWN_PREFERENCE_KEYS};
