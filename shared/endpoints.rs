use crate::document::{HttpMethod, Operation};
use crate::error::DocsResult;

/// One documented route/method pair
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDescriptor {
    pub path: String,
    pub method: HttpMethod,
    pub operation: Operation,
}

impl EndpointDescriptor {
    pub fn new(method: HttpMethod, path: impl Into<String>, operation: Operation) -> Self {
        Self {
            path: path.into(),
            method,
            operation,
        }
    }
}

/// Provider of the endpoint descriptors a document is assembled from
pub trait EndpointSource: Send + Sync {
    fn endpoints(&self) -> DocsResult<Vec<EndpointDescriptor>>;
}

/// A fixed list of descriptors
#[derive(Debug, Clone, Default)]
pub struct StaticEndpoints {
    descriptors: Vec<EndpointDescriptor>,
}

impl StaticEndpoints {
    pub fn new(descriptors: Vec<EndpointDescriptor>) -> Self {
        Self { descriptors }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl EndpointSource for StaticEndpoints {
    fn endpoints(&self) -> DocsResult<Vec<EndpointDescriptor>> {
        Ok(self.descriptors.clone())
    }
}

/// Restricts another source to paths under a prefix
#[derive(Debug, Clone)]
pub struct PrefixFilter<S> {
    inner: S,
    prefix: String,
}

impl<S: EndpointSource> PrefixFilter<S> {
    pub fn new(inner: S, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }
}

impl<S: EndpointSource> EndpointSource for PrefixFilter<S> {
    fn endpoints(&self) -> DocsResult<Vec<EndpointDescriptor>> {
        Ok(self
            .inner
            .endpoints()?
            .into_iter()
            .filter(|descriptor| descriptor.path.starts_with(&self.prefix))
            .collect())
    }
}

impl<T: EndpointSource + ?Sized> EndpointSource for std::sync::Arc<T> {
    fn endpoints(&self) -> DocsResult<Vec<EndpointDescriptor>> {
        (**self).endpoints()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(path: &str) -> EndpointDescriptor {
        EndpointDescriptor::new(
            HttpMethod::Get,
            path,
            Operation::new("test").response("200", "OK"),
        )
    }

    #[test]
    fn prefix_filter_keeps_matching_paths() {
        let source = StaticEndpoints::new(vec![
            descriptor("/health"),
            descriptor("/v2/openapi"),
            descriptor("/v2/databases/{database}/auth/session"),
        ]);
        let filtered = PrefixFilter::new(source, "/v2/").endpoints().unwrap();

        let paths: Vec<_> = filtered.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["/v2/openapi", "/v2/databases/{database}/auth/session"]
        );
    }

    #[test]
    fn static_endpoints_are_returned_in_order() {
        let source = StaticEndpoints::new(vec![descriptor("/b"), descriptor("/a")]);
        assert_eq!(source.len(), 2);
        let paths: Vec<_> = source
            .endpoints()
            .unwrap()
            .into_iter()
            .map(|d| d.path)
            .collect();
        assert_eq!(paths, vec!["/b", "/a"]);
    }
}
