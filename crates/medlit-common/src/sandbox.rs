use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::MedlitError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// An HTTP client that only talks to approved hosts.
///
/// Every upstream request (PubMed, OOIR) goes through this client so that a
/// journal name or specialty string can never redirect traffic elsewhere.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Build a client with the default allowlist and a 30 second timeout.
    pub fn new() -> Result<Self, MedlitError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, MedlitError> {
        let domains = [
            "eutils.ncbi.nlm.nih.gov", // PubMed E-utilities
            "pubmed.ncbi.nlm.nih.gov", // PubMed article pages
            "ooir.org",                // Journal rankings
            "localhost",
            "127.0.0.1",
        ];

        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| MedlitError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            allowlist: domains.iter().map(|d| d.to_string()).collect(),
        })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Allow the host of a configured base URL, e.g. a mirror or a test server.
    pub fn allow_url_host(&mut self, base_url: &str) -> Result<(), MedlitError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| MedlitError::Config(format!("Invalid base URL {}: {}", base_url, e)))?;
        if let Some(host) = parsed.host_str() {
            self.allow_domain(host);
        }
        Ok(())
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }

    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, MedlitError> {
        self.check(url)?;
        Ok(self.client.get(url))
    }

    fn check(&self, url: &str) -> Result<(), MedlitError> {
        if self.is_allowed(url) {
            Ok(())
        } else {
            Err(MedlitError::Security(format!(
                "Network capabilities capped: domain not in allowlist for URL {}",
                url
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allowlist() {
        let client = SandboxClient::new().unwrap();
        assert!(client.is_allowed("https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi"));
        assert!(client.is_allowed("https://ooir.org/journals.php?field=Clinical+Medicine"));
        assert!(client.is_allowed("http://127.0.0.1:8080/x"));
        assert!(!client.is_allowed("https://evil.example.com/"));
        assert!(!client.is_allowed("not a url"));
    }

    #[test]
    fn test_subdomain_is_allowed() {
        let client = SandboxClient::new().unwrap();
        assert!(client.is_allowed("https://www.ooir.org/journals.php"));
        assert!(!client.is_allowed("https://notooir.org/"));
    }

    #[test]
    fn test_allow_url_host() {
        let mut client = SandboxClient::new().unwrap();
        assert!(!client.is_allowed("https://mirror.example.net/eutils"));
        client.allow_url_host("https://mirror.example.net/eutils").unwrap();
        assert!(client.is_allowed("https://mirror.example.net/eutils/esearch.fcgi"));
    }

    #[test]
    fn test_blocked_request_is_security_error() {
        let client = SandboxClient::new().unwrap();
        let err = client.get("https://example.com/").unwrap_err();
        assert!(matches!(err, MedlitError::Security(_)));
    }
}
