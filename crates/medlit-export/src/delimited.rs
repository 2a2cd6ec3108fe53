//! CSV and JSON renderings.

use crate::error::Result;
use medlit_common::Article;

pub const CSV_HEADER: [&str; 9] = [
    "pubmed_id",
    "title",
    "journal",
    "publication_date",
    "authors",
    "mesh_terms",
    "abstract",
    "url",
    "impact_factor",
];

/// One spreadsheet row per article, in [`CSV_HEADER`] order. List fields are
/// joined with ", ".
pub(crate) fn article_row(article: &Article) -> [String; 9] {
    [
        article.pubmed_id.clone(),
        article.title.clone(),
        article.journal.clone(),
        article.publication_date.clone(),
        article.authors.join(", "),
        article.mesh_terms.join(", "),
        article.abstract_text.clone(),
        article.url.clone(),
        article.impact_factor.to_string(),
    ]
}

pub fn to_csv(articles: &[Article]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for article in articles {
        writer.write_record(article_row(article))?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()).into())
}

pub fn to_json(articles: &[Article]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(articles)?)
}
