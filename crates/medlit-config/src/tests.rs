#[cfg(test)]
mod tests {
    use super::super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8000");
        assert_eq!(config.database.url, "sqlite://medlit.db");
        assert_eq!(config.rankings.ttl_secs, 86_400);
        assert_eq!(config.rankings.request_delay_ms, 500);
        assert_eq!(config.rankings.timeout_secs, 25);
        assert_eq!(config.pubmed.tool, "medlit");
        assert!(config.pubmed.email.is_none());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            [rankings]
            ttl_secs = 60

            [pubmed]
            email = "curator@example.org"
            "#,
        )
        .unwrap();
        assert_eq!(config.rankings.ttl_secs, 60);
        assert_eq!(config.rankings.base_url, "https://ooir.org");
        assert_eq!(config.pubmed.email.as_deref(), Some("curator@example.org"));
        assert_eq!(config.pubmed.base_url, "https://eutils.ncbi.nlm.nih.gov/entrez/eutils");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nbind = \"0.0.0.0:9000\"").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.server.static_dir, "./static");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(Config::from_toml("[server\nbind = 1").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("MEDLIT_BIND", "0.0.0.0:8080"),
            ("MEDLIT_DATABASE_URL", "sqlite::memory:"),
            ("ENTREZ_EMAIL", " someone@example.org "),
            ("PUBMED_API_KEY", "k3y"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.pubmed.email.as_deref(), Some("someone@example.org"));
        assert_eq!(
            config.pubmed.api_key.as_ref().map(|k| k.expose_secret().to_string()),
            Some("k3y".to_string())
        );
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|_| Some("   ".to_string()));
        assert_eq!(config.server.bind, "127.0.0.1:8000");
        assert!(config.pubmed.api_key.is_none());
    }
}
