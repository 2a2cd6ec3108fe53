//! Connection pool and schema management.

use crate::error::Result;
use crate::schema;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

/// Main database handle.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the SQLite database at `url`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;
        info!(url, "Opened database");
        Ok(Self { pool })
    }

    /// A private in-memory database on a single pinned connection.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create all tables that don't exist yet.
    pub async fn initialize(&self) -> Result<()> {
        for statement in schema::MIGRATIONS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Row counts per table, for the startup log.
    pub async fn stats(&self) -> Result<DatabaseStats> {
        Ok(DatabaseStats {
            mesh_terms: self.count(schema::TABLE_MESH_TERMS).await?,
            bookmarks: self.count(schema::TABLE_BOOKMARKS).await?,
            search_history: self.count(schema::TABLE_SEARCH_HISTORY).await?,
        })
    }

    async fn count(&self, table: &str) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let n: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(n as u64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseStats {
    pub mesh_terms: u64,
    pub bookmarks: u64,
    pub search_history: u64,
}
