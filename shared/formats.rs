//! Wire formats for the OpenAPI document.
//!
//! Each endpoint is a [`Delivery`]: a format plus optional download
//! filename. Serving a delivery reads the cached document, encodes it and
//! returns a [`FormatEnvelope`] carrying the payload and transport metadata.

use crate::builder::CachedSpec;
use crate::document::OpenApiDocument;
use crate::error::{DocsError, DocsResult};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Filename offered by the YAML download endpoint
pub const YAML_DOWNLOAD_FILENAME: &str = "nile-auth.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentFormat::Json => "application/json",
            DocumentFormat::Yaml => "application/x-yaml",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Json => "json",
            DocumentFormat::Yaml => "yaml",
        }
    }

    pub fn encode(&self, document: &OpenApiDocument) -> DocsResult<Vec<u8>> {
        match self {
            DocumentFormat::Json => Ok(serde_json::to_vec(document)?),
            DocumentFormat::Yaml => Ok(serde_yaml::to_string(document)?.into_bytes()),
        }
    }

    pub fn decode(&self, payload: &[u8]) -> DocsResult<OpenApiDocument> {
        match self {
            DocumentFormat::Json => Ok(serde_json::from_slice(payload)?),
            DocumentFormat::Yaml => Ok(serde_yaml::from_slice(payload)?),
        }
    }

    /// Decode into an untyped tree, for validation of arbitrary payloads
    pub fn decode_value(&self, payload: &[u8]) -> DocsResult<serde_json::Value> {
        match self {
            DocumentFormat::Json => Ok(serde_json::from_slice(payload)?),
            DocumentFormat::Yaml => Ok(serde_yaml::from_slice(payload)?),
        }
    }
}

/// Encoded document plus the headers it must be served with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatEnvelope {
    pub payload: Vec<u8>,
    pub content_type: &'static str,
    pub content_disposition: Option<String>,
}

impl FormatEnvelope {
    /// Strong validator derived from the payload bytes
    pub fn etag(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.payload);
        format!("\"{:x}\"", hasher.finalize())
    }
}

/// How one endpoint presents the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub format: DocumentFormat,
    pub attachment_filename: Option<String>,
}

impl Delivery {
    /// Inline JSON for Swagger UI and other tooling
    pub fn swagger_json() -> Self {
        Self {
            format: DocumentFormat::Json,
            attachment_filename: None,
        }
    }

    /// YAML offered as a file download
    pub fn yaml_download() -> Self {
        Self {
            format: DocumentFormat::Yaml,
            attachment_filename: Some(YAML_DOWNLOAD_FILENAME.to_string()),
        }
    }

    pub fn content_disposition(&self) -> Option<String> {
        self.attachment_filename
            .as_ref()
            .map(|name| format!("attachment; filename={}", name))
    }

    pub fn envelope(&self, document: &OpenApiDocument) -> DocsResult<FormatEnvelope> {
        let payload = self.format.encode(document)?;
        if payload.is_empty() {
            return Err(DocsError::serialization("encoder produced an empty payload"));
        }
        Ok(FormatEnvelope {
            payload,
            content_type: self.format.content_type(),
            content_disposition: self.content_disposition(),
        })
    }
}

/// Read the cached document and encode it for `delivery`
pub fn serve(spec: &CachedSpec, delivery: &Delivery) -> DocsResult<FormatEnvelope> {
    let document = spec.get()?;
    let envelope = delivery.envelope(&document)?;
    debug!(
        content_type = envelope.content_type,
        bytes = envelope.payload.len(),
        "Encoded OpenAPI document"
    );
    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_download_sets_attachment() {
        let delivery = Delivery::yaml_download();
        assert_eq!(delivery.format.content_type(), "application/x-yaml");
        assert_eq!(
            delivery.content_disposition().as_deref(),
            Some("attachment; filename=nile-auth.yaml")
        );
    }

    #[test]
    fn swagger_json_is_inline() {
        let delivery = Delivery::swagger_json();
        assert_eq!(delivery.format.content_type(), "application/json");
        assert!(delivery.content_disposition().is_none());
    }

    #[test]
    fn etag_is_quoted_sha256() {
        let envelope = FormatEnvelope {
            payload: b"openapi: 3.0.0\n".to_vec(),
            content_type: "application/x-yaml",
            content_disposition: None,
        };
        let etag = envelope.etag();
        assert!(etag.starts_with('"') && etag.ends_with('"'));
        assert_eq!(etag.len(), 64 + 2);
    }

    #[test]
    fn malformed_yaml_is_a_serialization_error() {
        let err = DocumentFormat::Yaml.decode(b"openapi: [").unwrap_err();
        assert!(matches!(err, DocsError::Serialization(_)));
    }
}
