//! OpenAPI document delivery for the nile-auth service
//!
//! This library assembles a single in-memory description of the nile-auth
//! HTTP surface and serves it from several Vercel serverless functions,
//! each in its own wire format.
//!
//! ## Architecture
//!
//! 1. **Endpoint source** ([`endpoints`], [`catalog`]): descriptors of every
//!    documented route/method pair.
//! 2. **Spec builder** ([`builder`]): turns document metadata and the
//!    descriptors into an [`OpenApiDocument`], rejecting inputs that cannot
//!    form a valid document. [`CachedSpec`] keeps one document per process.
//! 3. **Format adapters** ([`formats`]): encode the document as JSON or YAML
//!    together with the headers it is served with.
//! 4. **Handlers** ([`handlers`]): one function per route, used by the
//!    binaries under `api/`.
//!
//! Every representation decodes to the same document:
//!
//! ```rust
//! use shared::{Delivery, DocsConfig, SpecRegistry};
//!
//! let registry = SpecRegistry::from_config(&DocsConfig::default());
//! let envelope = shared::formats::serve(&registry.primary, &Delivery::yaml_download()).unwrap();
//! let decoded = Delivery::yaml_download().format.decode(&envelope.payload).unwrap();
//! assert_eq!(decoded, registry.primary.builder().build().unwrap());
//! ```

pub mod builder;
pub mod catalog;
pub mod config;
pub mod document;
pub mod endpoints;
pub mod error;
pub mod export;
pub mod formats;
pub mod handlers;
pub mod health;
pub mod logging;
pub mod registry;
pub mod validate;

// Re-export commonly used types and functions
pub use builder::{CachedSpec, DocumentMetadata, SpecBuilder};
pub use config::DocsConfig;
pub use document::{HttpMethod, OpenApiDocument, Operation};
pub use endpoints::{EndpointDescriptor, EndpointSource, PrefixFilter, StaticEndpoints};
pub use error::{ApiError, DocsError, DocsResult};
pub use formats::{Delivery, DocumentFormat, FormatEnvelope};
pub use registry::SpecRegistry;
pub use validate::{has_operation, validate_document, ValidationIssue, ValidationReport};
