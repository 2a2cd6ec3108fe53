//! Search history repository.

use crate::database::Database;
use crate::error::Result;
use chrono::Utc;
use medlit_common::SearchHistoryEntry;
use sqlx::Row;
use std::sync::Arc;

#[derive(Clone)]
pub struct SearchHistoryRepository {
    db: Arc<Database>,
}

impl SearchHistoryRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn record(&self, query: &str, result_count: u64) -> Result<SearchHistoryEntry> {
        let timestamp = Utc::now();
        let result = sqlx::query(
            "INSERT INTO search_history (query, result_count, timestamp) VALUES (?, ?, ?)",
        )
        .bind(query)
        .bind(result_count as i64)
        .bind(timestamp)
        .execute(self.db.pool())
        .await?;

        Ok(SearchHistoryEntry {
            id: result.last_insert_rowid(),
            query: query.to_string(),
            result_count,
            timestamp,
        })
    }

    /// The `limit` most recent searches, newest first.
    pub async fn recent(&self, limit: u32) -> Result<Vec<SearchHistoryEntry>> {
        let rows = sqlx::query(
            "SELECT id, query, result_count, timestamp FROM search_history
             ORDER BY id DESC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| -> Result<SearchHistoryEntry> {
                let count: i64 = row.try_get("result_count")?;
                Ok(SearchHistoryEntry {
                    id: row.try_get("id")?,
                    query: row.try_get("query")?,
                    result_count: count.max(0) as u64,
                    timestamp: row.try_get("timestamp")?,
                })
            })
            .collect()
    }
}

/// The line logged for a search. Searches driven only by MeSH terms show up to
/// three of them. Returns `None` when there is nothing worth logging.
pub fn history_label(query: &str, mesh_terms: &[String]) -> Option<String> {
    let query = query.trim();
    if !query.is_empty() {
        return Some(query.to_string());
    }
    if mesh_terms.is_empty() {
        return None;
    }
    let shown: Vec<&str> = mesh_terms.iter().take(3).map(String::as_str).collect();
    let ellipsis = if mesh_terms.len() > 3 { "..." } else { "" };
    Some(format!("(MeSH terms: {}{})", shown.join(", "), ellipsis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recent_is_newest_first_and_limited() {
        let db = Database::in_memory().await.unwrap();
        db.initialize().await.unwrap();
        let repo = SearchHistoryRepository::new(Arc::new(db));

        for (q, n) in [("glaucoma", 10), ("myopia", 20), ("uveitis", 5)] {
            repo.record(q, n).await.unwrap();
        }

        let recent = repo.recent(2).await.unwrap();
        let queries: Vec<_> = recent.iter().map(|e| e.query.as_str()).collect();
        assert_eq!(queries, vec!["uveitis", "myopia"]);
        assert_eq!(recent[1].result_count, 20);
    }

    #[test]
    fn test_history_label() {
        let terms: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(history_label(" diabetes ", &terms).as_deref(), Some("diabetes"));
        assert_eq!(history_label("", &terms).as_deref(), Some("(MeSH terms: a, b, c...)"));
        assert_eq!(history_label("", &terms[..2]).as_deref(), Some("(MeSH terms: a, b)"));
        assert_eq!(history_label("  ", &[]), None);
    }
}
