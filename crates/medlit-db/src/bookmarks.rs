//! Bookmark repository.
//!
//! One row per PMID. Bookmarking an already-saved PMID replaces its metadata
//! and moves it to the top of the list.

use crate::database::Database;
use crate::error::{DbError, Result};
use chrono::{DateTime, Utc};
use medlit_common::Bookmark;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct BookmarkRepository {
    db: Arc<Database>,
}

impl BookmarkRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert or overwrite the bookmark for `bookmark.pmid`. The stored
    /// timestamp is always the time of this call.
    pub async fn upsert(&self, bookmark: &Bookmark) -> Result<Bookmark> {
        self.upsert_at(bookmark, Utc::now()).await
    }

    async fn upsert_at(&self, bookmark: &Bookmark, timestamp: DateTime<Utc>) -> Result<Bookmark> {
        let pmid = bookmark.pmid.trim();
        if pmid.is_empty() {
            return Err(DbError::MissingIdentifier);
        }

        sqlx::query(
            "INSERT INTO bookmarks (pmid, title, authors, journal, pub_date, abstract, timestamp)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(pmid) DO UPDATE SET
                title = excluded.title,
                authors = excluded.authors,
                journal = excluded.journal,
                pub_date = excluded.pub_date,
                abstract = excluded.abstract,
                timestamp = excluded.timestamp",
        )
        .bind(pmid)
        .bind(&bookmark.title)
        .bind(&bookmark.authors)
        .bind(&bookmark.journal)
        .bind(&bookmark.pub_date)
        .bind(&bookmark.abstract_text)
        .bind(timestamp)
        .execute(self.db.pool())
        .await?;

        debug!(pmid, "Bookmarked article");
        Ok(Bookmark {
            pmid: pmid.to_string(),
            timestamp,
            ..bookmark.clone()
        })
    }

    pub async fn remove(&self, pmid: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE pmid = ?")
            .bind(pmid.trim())
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("Bookmark for PMID {}", pmid)));
        }
        Ok(())
    }

    /// Newest first.
    pub async fn list(&self) -> Result<Vec<Bookmark>> {
        let rows = sqlx::query(
            "SELECT pmid, title, authors, journal, pub_date, abstract, timestamp
             FROM bookmarks ORDER BY timestamp DESC, rowid DESC",
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_bookmark).collect()
    }

    pub async fn get(&self, pmid: &str) -> Result<Option<Bookmark>> {
        let row = sqlx::query(
            "SELECT pmid, title, authors, journal, pub_date, abstract, timestamp
             FROM bookmarks WHERE pmid = ?",
        )
        .bind(pmid.trim())
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_bookmark).transpose()
    }
}

fn row_to_bookmark(row: &SqliteRow) -> Result<Bookmark> {
    Ok(Bookmark {
        pmid: row.try_get("pmid")?,
        title: row.try_get("title")?,
        authors: row.try_get("authors")?,
        journal: row.try_get("journal")?,
        pub_date: row.try_get("pub_date")?,
        abstract_text: row.try_get("abstract")?,
        timestamp: row.try_get("timestamp")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn repo() -> BookmarkRepository {
        let db = Database::in_memory().await.unwrap();
        db.initialize().await.unwrap();
        BookmarkRepository::new(Arc::new(db))
    }

    fn bookmark(pmid: &str, title: &str) -> Bookmark {
        Bookmark {
            pmid: pmid.to_string(),
            title: title.to_string(),
            authors: "A. Author".to_string(),
            journal: "Ophthalmology".to_string(),
            pub_date: "2024-03-01".to_string(),
            abstract_text: String::new(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_missing_pmid_rejected() {
        let repo = repo().await;
        let err = repo.upsert(&bookmark("  ", "x")).await.unwrap_err();
        assert!(matches!(err, DbError::MissingIdentifier));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rebookmark_overwrites_and_stays_unique() {
        let repo = repo().await;
        let t0 = Utc::now() - Duration::minutes(5);
        repo.upsert_at(&bookmark("111", "Old title"), t0).await.unwrap();
        repo.upsert_at(&bookmark("222", "Other"), t0 + Duration::minutes(1)).await.unwrap();

        let t2 = t0 + Duration::minutes(2);
        repo.upsert_at(&bookmark("111", "New title"), t2).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].pmid, "111");
        assert_eq!(all[0].title, "New title");
        assert_eq!(all[0].timestamp, t2);
        assert_eq!(all[1].pmid, "222");
    }

    #[tokio::test]
    async fn test_remove_absent_leaves_store_unchanged() {
        let repo = repo().await;
        repo.upsert(&bookmark("111", "Kept")).await.unwrap();

        let err = repo.remove("999").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
        assert_eq!(repo.list().await.unwrap().len(), 1);

        repo.remove("111").await.unwrap();
        assert!(repo.get("111").await.unwrap().is_none());
    }
}
