//! Entrez credential store, kept as key/value rows in the `config` table.

use crate::database::Database;
use crate::error::Result;
use medlit_common::EntrezCredentials;
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

const KEY_EMAIL: &str = "entrez_email";
const KEY_API_KEY: &str = "pubmed_api_key";

/// Value the settings form ships with before the user pastes a real key.
pub const API_KEY_PLACEHOLDER: &str = "your_pubmed_api_key_here";

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialUpdate {
    pub entrez_email: Option<String>,
    pub pubmed_api_key: Option<String>,
}

#[derive(Clone)]
pub struct CredentialRepository {
    db: Arc<Database>,
}

impl CredentialRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn get_credentials(&self) -> Result<EntrezCredentials> {
        let email = self.get_value(KEY_EMAIL).await?.unwrap_or_default();
        let api_key = self.get_value(KEY_API_KEY).await?;
        Ok(EntrezCredentials::new(email, api_key.as_deref()))
    }

    pub async fn save_credentials(&self, update: &CredentialUpdate) -> Result<EntrezCredentials> {
        if let Some(email) = &update.entrez_email {
            self.set_value(KEY_EMAIL, email.trim()).await?;
        }
        if let Some(key) = &update.pubmed_api_key {
            self.set_value(KEY_API_KEY, &sanitize_api_key(key)).await?;
        }
        info!(
            email_updated = update.entrez_email.is_some(),
            api_key_updated = update.pubmed_api_key.is_some(),
            "Saved Entrez credentials"
        );
        self.get_credentials().await
    }

    /// Fill in credentials from the environment without overwriting anything
    /// the user already saved.
    pub async fn seed_if_empty(&self, defaults: &EntrezCredentials) -> Result<()> {
        let current = self.get_credentials().await?;
        let update = CredentialUpdate {
            entrez_email: if current.has_email() { None } else { defaults.email.clone() },
            pubmed_api_key: if current.has_api_key() {
                None
            } else {
                defaults.api_key.as_ref().map(|k| k.expose_secret().to_string())
            },
        };
        if update.entrez_email.is_some() || update.pubmed_api_key.is_some() {
            self.save_credentials(&update).await?;
        }
        Ok(())
    }

    async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let value = sqlx::query_scalar("SELECT value FROM config WHERE key = ?")
            .bind(key)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(value)
    }

    async fn set_value(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO config (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}

fn sanitize_api_key(key: &str) -> String {
    let key = key.trim();
    if key.eq_ignore_ascii_case(API_KEY_PLACEHOLDER) {
        String::new()
    } else {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo() -> CredentialRepository {
        let db = Database::in_memory().await.unwrap();
        db.initialize().await.unwrap();
        CredentialRepository::new(Arc::new(db))
    }

    #[tokio::test]
    async fn test_empty_store_has_no_credentials() {
        let creds = repo().await.get_credentials().await.unwrap();
        assert!(!creds.has_email());
        assert!(!creds.has_api_key());
    }

    #[tokio::test]
    async fn test_placeholder_key_stored_as_empty() {
        let repo = repo().await;
        let creds = repo
            .save_credentials(&CredentialUpdate {
                entrez_email: Some(" me@example.org ".into()),
                pubmed_api_key: Some(" YOUR_PUBMED_API_KEY_HERE ".into()),
            })
            .await
            .unwrap();
        assert_eq!(creds.email.as_deref(), Some("me@example.org"));
        assert!(!creds.has_api_key());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_field() {
        let repo = repo().await;
        repo.save_credentials(&CredentialUpdate {
            entrez_email: Some("me@example.org".into()),
            pubmed_api_key: Some("abc".into()),
        })
        .await
        .unwrap();

        let creds = repo
            .save_credentials(&CredentialUpdate { entrez_email: None, pubmed_api_key: Some("def".into()) })
            .await
            .unwrap();
        assert_eq!(creds.email.as_deref(), Some("me@example.org"));
        assert_eq!(creds.api_key_str(), Some("def"));
    }

    #[tokio::test]
    async fn test_seed_does_not_overwrite() {
        let repo = repo().await;
        repo.save_credentials(&CredentialUpdate { entrez_email: Some("saved@example.org".into()), pubmed_api_key: None })
            .await
            .unwrap();

        repo.seed_if_empty(&EntrezCredentials::new("env@example.org", Some("envkey")))
            .await
            .unwrap();

        let creds = repo.get_credentials().await.unwrap();
        assert_eq!(creds.email.as_deref(), Some("saved@example.org"));
        assert_eq!(creds.api_key_str(), Some("envkey"));
    }
}
