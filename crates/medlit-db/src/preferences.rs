//! Free-form user preferences stored as JSON values.

use crate::database::Database;
use crate::error::{DbError, Result};
use serde_json::Value;
use sqlx::Row;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Keys the settings page always asks for.
pub const KNOWN_PREFERENCE_KEYS: &[&str] =
    &["default_specialty", "default_sort", "theme", "results_per_page"];

#[derive(Clone)]
pub struct PreferenceRepository {
    db: Arc<Database>,
}

impl PreferenceRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(self.db.pool())
            .await?;
        raw.map(|s| serde_json::from_str(&s).map_err(DbError::from)).transpose()
    }

    pub async fn set(&self, key: &str, value: &Value) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(DbError::Invalid("Preference key must not be empty".to_string()));
        }
        sqlx::query(
            "INSERT INTO preferences (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(serde_json::to_string(value)?)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Every stored preference, plus the known keys as `null` when unset.
    pub async fn all(&self) -> Result<BTreeMap<String, Value>> {
        let rows = sqlx::query("SELECT key, value FROM preferences")
            .fetch_all(self.db.pool())
            .await?;

        let mut prefs: BTreeMap<String, Value> = KNOWN_PREFERENCE_KEYS
            .iter()
            .map(|k| (k.to_string(), Value::Null))
            .collect();
        for row in rows {
            let key: String = row.try_get("key")?;
            let raw: String = row.try_get("value")?;
            prefs.insert(key, serde_json::from_str(&raw)?);
        }
        Ok(prefs)
    }
}
