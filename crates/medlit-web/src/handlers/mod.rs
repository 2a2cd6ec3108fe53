//! HTTP handlers for all API routes.

pub mod bookmarks;
pub mod mesh;
pub mod rankings;
pub mod search;
pub mod settings;
pub mod system;

use axum::http::header;
use axum::response::{IntoResponse, Response};

/// A file download with the given type and suggested name.
pub(crate) fn attachment(body: Vec<u8>, content_type: &'static str, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}
