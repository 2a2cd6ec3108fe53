//! medlit-export: Search-result downloads and single-article citations.
//!
//! Formats: CSV, XLSX, JSON and BibTeX for result sets; MEDLINE (`.nbib`) or
//! BibTeX for one article.

pub mod bibtex;
pub mod delimited;
pub mod error;
pub mod format;
pub mod medline;
pub mod xlsx;

pub use error::{ExportError, Result};
pub use format::{CitationFormat, ExportFormat, NBIB_CONTENT_TYPE};

use medlit_common::Article;
use tracing::debug;

/// Render `articles` in `format`.
pub fn export(articles: &[Article], format: ExportFormat) -> Result<Vec<u8>> {
    let bytes = match format {
        ExportFormat::Csv => delimited::to_csv(articles)?,
        ExportFormat::Xlsx => xlsx::to_xlsx(articles)?,
        ExportFormat::Json => delimited::to_json(articles)?,
        ExportFormat::Bibtex => bibtex::to_bibtex(articles),
    };
    debug!(%format, articles = articles.len(), bytes = bytes.len(), "Rendered export");
    Ok(bytes)
}

/// Citation file for one article.
pub fn cite(article: &Article, format: CitationFormat) -> Vec<u8> {
    match format {
        CitationFormat::Nbib => medline::to_nbib(article).into_bytes(),
        CitationFormat::Bibtex => {
            let mut entry = bibtex::bibtex_entry(article);
            entry.push('\n');
            entry.into_bytes()
        }
    }
}
