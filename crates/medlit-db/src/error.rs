//! Database error types.

use medlit_common::MedlitError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Missing identifier")]
    MissingIdentifier,

    #[error("Invalid value: {0}")]
    Invalid(String),
}

impl From<DbError> for MedlitError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(what) => MedlitError::NotFound(what),
            DbError::Duplicate(term) => MedlitError::DuplicateTerm(term),
            DbError::MissingIdentifier => MedlitError::MissingIdentifier,
            DbError::Invalid(msg) => MedlitError::InvalidInput(msg),
            DbError::Serialization(e) => MedlitError::Serialization(e),
            DbError::Sqlx(e) => MedlitError::Database(e.to_string()),
        }
    }
}

/// True when the error is a UNIQUE/PRIMARY KEY constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
