//! Configuration loading for medlit.
//! Reads medlit.toml from the current directory or the path in the MEDLIT_CONFIG env var,
//! then applies environment overrides.

use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pubmed: PubmedConfig,
    #[serde(default)]
    pub rankings: RankingsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_bind()       -> String { "127.0.0.1:8000".to_string() }
fn default_static_dir() -> String { "./static".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), static_dir: default_static_dir() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url()    -> String { "sqlite://medlit.db".to_string() }
fn default_max_connections() -> u32    { 5 }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: default_database_url(), max_connections: default_max_connections() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PubmedConfig {
    #[serde(default = "default_pubmed_base_url")]
    pub base_url: String,
    #[serde(default = "default_tool")]
    pub tool: String,
    #[serde(default = "default_max_download_results")]
    pub max_download_results: u32,
    /// Seeds the credential store when it has no email yet.
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub api_key: Option<SecretString>,
}

fn default_pubmed_base_url()      -> String { "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string() }
fn default_tool()                 -> String { "medlit".to_string() }
fn default_max_download_results() -> u32    { 5000 }

impl Default for PubmedConfig {
    fn default() -> Self {
        Self {
            base_url: default_pubmed_base_url(),
            tool: default_tool(),
            max_download_results: default_max_download_results(),
            email: None,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingsConfig {
    #[serde(default = "default_rankings_base_url")]
    pub base_url: String,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_rankings_base_url() -> String { "https://ooir.org".to_string() }
fn default_ttl_secs()          -> u64    { 24 * 60 * 60 }
fn default_request_delay_ms()  -> u64    { 500 }
fn default_timeout_secs()      -> u64    { 25 }

impl Default for RankingsConfig {
    fn default() -> Self {
        Self {
            base_url: default_rankings_base_url(),
            ttl_secs: default_ttl_secs(),
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

mod tests;

impl Config {
    /// Load configuration.
    ///
    /// `.env` is read first. MEDLIT_CONFIG must point at an existing file when set;
    /// otherwise `./medlit.toml` is used if present, and built-in defaults if not.
    /// Environment overrides are applied last.
    pub fn load() -> anyhow::Result<Self> {
        // A missing .env is normal.
        let _ = dotenvy::dotenv();

        let mut config = match std::env::var("MEDLIT_CONFIG") {
            Ok(path) => {
                if !Path::new(&path).exists() {
                    anyhow::bail!(
                        "Config file not found: {}\n\
                         Unset MEDLIT_CONFIG or point it at an existing medlit.toml.",
                        path
                    );
                }
                Self::from_file(&path)?
            }
            Err(_) if Path::new("medlit.toml").exists() => Self::from_file("medlit.toml")?,
            Err(_) => {
                tracing::info!("No medlit.toml found, using defaults");
                Config::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply MEDLIT_BIND, MEDLIT_DATABASE_URL, ENTREZ_EMAIL and PUBMED_API_KEY.
    /// Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(bind) = get("MEDLIT_BIND") {
            self.server.bind = bind;
        }
        if let Some(url) = get("MEDLIT_DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(email) = get("ENTREZ_EMAIL") {
            self.pubmed.email = Some(email.trim().to_string());
        }
        if let Some(key) = get("PUBMED_API_KEY") {
            self.pubmed.api_key = Some(SecretString::from(key.trim().to_string()));
        }
    }
}
