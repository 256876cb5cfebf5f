use crate::document::{
    Info, OpenApiDocument, ParameterLocation, PathItem, Server, Tag, OPENAPI_VERSION,
};
use crate::endpoints::{EndpointDescriptor, EndpointSource};
use crate::error::{DocsError, DocsResult};
use crate::validate::is_response_key;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Static document metadata
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMetadata {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    pub servers: Vec<Server>,
    pub tag_descriptions: BTreeMap<String, String>,
}

impl DocumentMetadata {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
            servers: Vec::new(),
            tag_descriptions: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_server(mut self, url: impl Into<String>) -> Self {
        self.servers.push(Server {
            url: url.into(),
            description: None,
        });
        self
    }

    pub fn with_tag_descriptions(mut self, descriptions: BTreeMap<String, String>) -> Self {
        self.tag_descriptions = descriptions;
        self
    }
}

/// Assembles an OpenAPI document from metadata and an endpoint source
#[derive(Clone)]
pub struct SpecBuilder {
    metadata: DocumentMetadata,
    source: Arc<dyn EndpointSource>,
}

impl std::fmt::Debug for SpecBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecBuilder")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl SpecBuilder {
    pub fn new<S: EndpointSource + 'static>(metadata: DocumentMetadata, source: S) -> Self {
        Self {
            metadata,
            source: Arc::new(source),
        }
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// Build a fresh document. Pure with respect to process state.
    pub fn build(&self) -> DocsResult<OpenApiDocument> {
        let title = self.metadata.title.trim();
        if title.is_empty() {
            return Err(DocsError::generation("document title is empty"));
        }
        let version = self.metadata.version.trim();
        if version.is_empty() {
            return Err(DocsError::generation("document version is empty"));
        }

        let descriptors = self.source.endpoints()?;
        if descriptors.is_empty() {
            return Err(DocsError::generation(
                "endpoint source returned no endpoints",
            ));
        }

        let mut paths: BTreeMap<String, PathItem> = BTreeMap::new();
        let mut operation_ids = HashSet::new();
        let mut tag_names = BTreeSet::new();

        for descriptor in descriptors {
            check_descriptor(&descriptor)?;

            let EndpointDescriptor {
                path,
                method,
                operation,
            } = descriptor;

            if let Some(id) = &operation.operation_id {
                if !operation_ids.insert(id.clone()) {
                    return Err(DocsError::generation(format!(
                        "operationId '{}' is used more than once",
                        id
                    )));
                }
            }
            tag_names.extend(operation.tags.iter().cloned());

            let item = paths.entry(path.clone()).or_default();
            if item.contains_key(&method) {
                return Err(DocsError::generation(format!(
                    "{} {} is declared more than once",
                    method, path
                )));
            }
            item.insert(method, operation);
        }

        let tags = tag_names
            .into_iter()
            .map(|name| Tag {
                description: self.metadata.tag_descriptions.get(&name).cloned(),
                name,
            })
            .collect();

        let document = OpenApiDocument {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: title.to_string(),
                version: version.to_string(),
                description: self.metadata.description.clone(),
            },
            servers: self.metadata.servers.clone(),
            tags,
            paths,
        };

        debug!(
            title = %document.info.title,
            paths = document.paths.len(),
            operations = document.operation_count(),
            "Built OpenAPI document"
        );

        Ok(document)
    }
}

fn check_descriptor(descriptor: &EndpointDescriptor) -> DocsResult<()> {
    let path = &descriptor.path;
    let method = descriptor.method;

    if !path.starts_with('/') {
        return Err(DocsError::generation(format!(
            "path '{}' must start with '/'",
            path
        )));
    }
    if descriptor.operation.responses.is_empty() {
        return Err(DocsError::generation(format!(
            "{} {} declares no responses",
            method, path
        )));
    }

    for status in descriptor.operation.responses.keys() {
        if !is_response_key(status) {
            return Err(DocsError::generation(format!(
                "{} {} has invalid response key '{}'",
                method, path, status
            )));
        }
    }

    if let Some(body) = &descriptor.operation.request_body {
        if body.content.is_empty() {
            return Err(DocsError::generation(format!(
                "{} {} has a request body without content",
                method, path
            )));
        }
    }

    let mut seen = HashSet::new();
    for parameter in &descriptor.operation.parameters {
        if !seen.insert((parameter.name.as_str(), parameter.location)) {
            return Err(DocsError::generation(format!(
                "{} {} declares parameter '{}' more than once",
                method, path, parameter.name
            )));
        }
        if parameter.location == ParameterLocation::Path && !parameter.required {
            return Err(DocsError::generation(format!(
                "{} {} path parameter '{}' must be required",
                method, path, parameter.name
            )));
        }
    }

    let templated = template_params(path)?;
    let declared: BTreeSet<&str> = descriptor
        .operation
        .parameters
        .iter()
        .filter(|p| p.location == ParameterLocation::Path)
        .map(|p| p.name.as_str())
        .collect();

    for name in &templated {
        if !declared.contains(name) {
            return Err(DocsError::generation(format!(
                "{} {} has no path parameter for '{{{}}}'",
                method, path, name
            )));
        }
    }
    for name in &declared {
        if !templated.contains(name) {
            return Err(DocsError::generation(format!(
                "{} {} declares path parameter '{}' missing from the route",
                method, path, name
            )));
        }
    }

    Ok(())
}

/// Names of the `{param}` segments of a route template
pub(crate) fn template_params(path: &str) -> DocsResult<BTreeSet<&str>> {
    let mut names = BTreeSet::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        if rest[..start].contains('}') {
            break;
        }
        let after = &rest[start + 1..];
        let end = after.find('}').ok_or_else(|| {
            DocsError::generation(format!("path '{}' has an unclosed '{{'", path))
        })?;
        let name = &after[..end];
        if name.is_empty() || name.contains('{') {
            return Err(DocsError::generation(format!(
                "path '{}' has a malformed parameter",
                path
            )));
        }
        names.insert(name);
        rest = &after[end + 1..];
    }
    if rest.contains('}') {
        return Err(DocsError::generation(format!(
            "path '{}' has an unmatched '}}'",
            path
        )));
    }
    Ok(names)
}

/// Process-lifetime cache of one builder's document.
///
/// Concurrent first callers may each run the builder; the first stored value
/// wins and every later read returns that same `Arc`. Failures are not cached.
#[derive(Debug)]
pub struct CachedSpec {
    builder: SpecBuilder,
    document: OnceLock<Arc<OpenApiDocument>>,
}

impl CachedSpec {
    pub fn new(builder: SpecBuilder) -> Self {
        Self {
            builder,
            document: OnceLock::new(),
        }
    }

    pub fn builder(&self) -> &SpecBuilder {
        &self.builder
    }

    pub fn is_built(&self) -> bool {
        self.document.get().is_some()
    }

    pub fn get(&self) -> DocsResult<Arc<OpenApiDocument>> {
        if let Some(document) = self.document.get() {
            return Ok(Arc::clone(document));
        }

        let built = Arc::new(self.builder.build()?);
        let document = self.document.get_or_init(|| built);
        info!(
            title = %document.info.title,
            paths = document.paths.len(),
            "Cached OpenAPI document"
        );
        Ok(Arc::clone(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_params_are_extracted() {
        let names = template_params("/v2/databases/{database}/tenants/{tenantId}").unwrap();
        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["database", "tenantId"]
        );
        assert!(template_params("/health").unwrap().is_empty());
    }

    #[test]
    fn malformed_templates_are_rejected() {
        assert!(template_params("/v2/{database").is_err());
        assert!(template_params("/v2/database}").is_err());
        assert!(template_params("/v2/{}/auth").is_err());
    }
}
