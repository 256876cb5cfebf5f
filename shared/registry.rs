use crate::builder::{CachedSpec, DocumentMetadata, SpecBuilder};
use crate::catalog::{nile_auth_endpoints, tag_descriptions};
use crate::config::DocsConfig;
use crate::endpoints::PrefixFilter;
use std::sync::OnceLock;

/// Route prefix of the v2 document
pub const V2_PREFIX: &str = "/v2/";

/// The documents this service publishes, each cached for the process lifetime
#[derive(Debug)]
pub struct SpecRegistry {
    /// Full nile-auth surface, served at `/swagger/spec` and `/v2/openapi`
    pub primary: CachedSpec,
    /// Routes under `/v2/`, served at `/v2/swagger/spec`
    pub v2: CachedSpec,
}

impl SpecRegistry {
    pub fn from_config(config: &DocsConfig) -> Self {
        let primary = SpecBuilder::new(
            metadata(config, &config.title),
            nile_auth_endpoints(),
        );
        let v2 = SpecBuilder::new(
            metadata(config, &config.v2_title),
            PrefixFilter::new(nile_auth_endpoints(), V2_PREFIX),
        );

        Self {
            primary: CachedSpec::new(primary),
            v2: CachedSpec::new(v2),
        }
    }

    /// Registry configured from the environment on first use
    pub fn global() -> &'static SpecRegistry {
        static REGISTRY: OnceLock<SpecRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| Self::from_config(&DocsConfig::from_env()))
    }
}

fn metadata(config: &DocsConfig, title: &str) -> DocumentMetadata {
    let mut metadata = DocumentMetadata::new(title, config.version.clone())
        .with_tag_descriptions(tag_descriptions());
    if let Some(description) = &config.description {
        metadata = metadata.with_description(description.clone());
    }
    for server in &config.servers {
        metadata = metadata.with_server(server.clone());
    }
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MFA_PATH;
    use crate::document::HttpMethod;

    #[test]
    fn v2_document_is_a_subset_of_primary() {
        let registry = SpecRegistry::from_config(&DocsConfig::default());
        let primary = registry.primary.get().unwrap();
        let v2 = registry.v2.get().unwrap();

        assert!(v2.paths.len() < primary.paths.len());
        assert!(v2.paths.keys().all(|path| path.starts_with(V2_PREFIX)));
        for (path, item) in &v2.paths {
            assert_eq!(primary.paths.get(path), Some(item));
        }
        assert!(v2.operation(MFA_PATH, HttpMethod::Delete).is_some());
        assert!(primary.paths.contains_key("/swagger/spec"));
        assert!(!v2.paths.contains_key("/swagger/spec"));
    }

    #[test]
    fn titles_come_from_config() {
        let config = DocsConfig {
            title: "auth".to_string(),
            v2_title: "auth v2".to_string(),
            servers: vec!["https://api.example.com".to_string()],
            ..DocsConfig::default()
        };
        let registry = SpecRegistry::from_config(&config);
        let primary = registry.primary.get().unwrap();
        assert_eq!(primary.info.title, "auth");
        assert_eq!(primary.servers[0].url, "https://api.example.com");
        assert_eq!(registry.v2.get().unwrap().info.title, "auth v2");
    }
}
