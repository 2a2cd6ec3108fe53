//! MeSH term repository.
//!
//! Terms are unique case-insensitively. Deleting a term hands out no undo
//! token; re-adding by name creates a fresh id.

use crate::database::Database;
use crate::error::{is_unique_violation, DbError, Result};
use crate::schema::{term_key, DEFAULT_MESH_TERMS};
use chrono::Utc;
use medlit_common::MeshTerm;
use sqlx::Row;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct MeshTermRepository {
    db: Arc<Database>,
}

impl MeshTermRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// All terms, alphabetical ignoring case.
    pub async fn list(&self) -> Result<Vec<MeshTerm>> {
        let rows = sqlx::query("SELECT id, term FROM mesh_terms ORDER BY term_key, term")
            .fetch_all(self.db.pool())
            .await?;

        rows.iter()
            .map(|row| -> Result<MeshTerm> {
                Ok(MeshTerm {
                    id: row.try_get("id")?,
                    term: row.try_get("term")?,
                })
            })
            .collect()
    }

    /// Just the term strings, in list order.
    pub async fn list_terms(&self) -> Result<Vec<String>> {
        Ok(self.list().await?.into_iter().map(|t| t.term).collect())
    }

    pub async fn add(&self, term: &str) -> Result<MeshTerm> {
        let term = term.trim();
        if term.is_empty() {
            return Err(DbError::Invalid("MeSH term must not be empty".to_string()));
        }

        let id = Uuid::new_v4().to_string();
        let inserted = sqlx::query(
            "INSERT INTO mesh_terms (id, term, term_key, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(term)
        .bind(term_key(term))
        .bind(Utc::now())
        .execute(self.db.pool())
        .await;

        match inserted {
            Ok(_) => {
                debug!(term, id = %id, "Added MeSH term");
                Ok(MeshTerm { id, term: term.to_string() })
            }
            Err(e) if is_unique_violation(&e) => Err(DbError::Duplicate(term.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM mesh_terms WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("MeSH term with ID {}", id)));
        }
        Ok(())
    }

    pub async fn count(&self) -> Result<u64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mesh_terms")
            .fetch_one(self.db.pool())
            .await?;
        Ok(n as u64)
    }

    /// Insert every default term not already present. Returns how many were added.
    pub async fn seed_defaults(&self) -> Result<u64> {
        let mut inserted = 0;
        for term in DEFAULT_MESH_TERMS {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO mesh_terms (id, term, term_key, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(*term)
            .bind(term_key(term))
            .bind(Utc::now())
            .execute(self.db.pool())
            .await?;
            inserted += result.rows_affected();
        }
        info!(inserted, "Seeded default MeSH terms");
        Ok(inserted)
    }

    /// Seed the defaults only into an empty table.
    pub async fn seed_defaults_if_empty(&self) -> Result<u64> {
        if self.count().await? > 0 {
            return Ok(0);
        }
        self.seed_defaults().await
    }
}
