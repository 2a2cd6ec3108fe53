use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MedlitError {
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("MeSH term '{0}' already exists")]
    DuplicateTerm(String),

    #[error("Search needs query text or at least one MeSH term")]
    EmptyQuery,

    #[error("Article has no PMID")]
    MissingIdentifier,

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MedlitError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MedlitError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            MedlitError::NotFound(_) => StatusCode::NOT_FOUND,
            MedlitError::DuplicateTerm(_) => StatusCode::CONFLICT,
            MedlitError::EmptyQuery
            | MedlitError::MissingIdentifier
            | MedlitError::UnsupportedFormat(_)
            | MedlitError::InvalidInput(_)
            | MedlitError::Config(_) => StatusCode::BAD_REQUEST,
            MedlitError::Serialization(_)
            | MedlitError::Xml(_)
            | MedlitError::Database(_)
            | MedlitError::Security(_)
            | MedlitError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, MedlitError>;

impl From<JsonRejection> for MedlitError {
    fn from(rejection: JsonRejection) -> Self {
        MedlitError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for MedlitError {
    fn from(rejection: QueryRejection) -> Self {
        MedlitError::InvalidInput(rejection.body_text())
    }
}

/// Error type returned by HTTP handlers.
#[derive(Debug)]
pub struct ApiError(pub MedlitError);

impl<E> From<E> for ApiError
where
    E: Into<MedlitError>,
{
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, %status, "Request rejected");
        }
        let body = Json(json!({
            "status": "error",
            "detail": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_client_errors() {
        assert_eq!(MedlitError::EmptyQuery.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(MedlitError::MissingIdentifier.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            MedlitError::UnsupportedFormat("pdf".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_duplicate_term_is_conflict() {
        let err = MedlitError::DuplicateTerm("Cardiology".into());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(err.to_string().contains("Cardiology"));
    }

    #[test]
    fn test_upstream_maps_to_bad_gateway() {
        let err = MedlitError::UpstreamUnavailable("ooir.org timed out".into());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
