use std::env;

/// Documentation configuration
#[derive(Debug, Clone)]
pub struct DocsConfig {
    /// `info.title` of the primary document
    pub title: String,
    /// `info.title` of the v2 document
    pub v2_title: String,
    /// `info.version` of both documents
    pub version: String,
    pub description: Option<String>,
    /// Server URLs listed in both documents
    pub servers: Vec<String>,
    /// Raises the default log filter to debug
    pub debug_mode: bool,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            title: "nile-auth".to_string(),
            v2_title: "nile-auth v2".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: Some(
                "Authentication for Nile databases: sessions, providers, multi-factor \
                 authentication, users and tenants."
                    .to_string(),
            ),
            servers: Vec::new(),
            debug_mode: false,
        }
    }
}

impl DocsConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        // Load .env file if it exists (not available in serverless)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        Self {
            title: env::var("NILE_AUTH_DOCS_TITLE").unwrap_or(defaults.title),
            v2_title: env::var("NILE_AUTH_DOCS_V2_TITLE").unwrap_or(defaults.v2_title),
            version: env::var("NILE_AUTH_DOCS_VERSION").unwrap_or(defaults.version),
            description: env::var("NILE_AUTH_DOCS_DESCRIPTION")
                .ok()
                .or(defaults.description)
                .filter(|d| !d.trim().is_empty()),
            servers: env::var("NILE_AUTH_DOCS_SERVERS")
                .map(|servers| parse_list(&servers))
                .unwrap_or(defaults.servers),
            debug_mode: env::var("DEBUG_DOCS").unwrap_or_default() == "true",
        }
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_list_skips_blanks() {
        assert_eq!(
            parse_list("https://api.thenile.dev, ,http://localhost:3001,"),
            vec!["https://api.thenile.dev", "http://localhost:3001"]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn defaults_name_the_service() {
        let config = DocsConfig::default();
        assert_eq!(config.title, "nile-auth");
        assert!(!config.version.is_empty());
        assert!(config.servers.is_empty());
    }
}
