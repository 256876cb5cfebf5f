use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type alias for document generation and delivery
pub type DocsResult<T> = Result<T, DocsError>;

/// Errors raised while producing or encoding an OpenAPI document
#[derive(Debug)]
pub enum DocsError {
    /// The document metadata or endpoint descriptors cannot form a valid document
    Generation(String),
    /// The document could not be converted to or from a wire format
    Serialization(String),
}

impl DocsError {
    pub fn generation(message: impl Into<String>) -> Self {
        DocsError::Generation(message.into())
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        DocsError::Serialization(message.into())
    }

    /// Stable error code used in HTTP error bodies
    pub fn code(&self) -> &'static str {
        match self {
            DocsError::Generation(_) => "GenerationError",
            DocsError::Serialization(_) => "SerializationError",
        }
    }
}

impl fmt::Display for DocsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocsError::Generation(msg) => write!(f, "Generation error: {}", msg),
            DocsError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for DocsError {}

impl From<serde_json::Error> for DocsError {
    fn from(err: serde_json::Error) -> Self {
        DocsError::Serialization(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for DocsError {
    fn from(err: serde_yaml::Error) -> Self {
        DocsError::Serialization(format!("YAML: {}", err))
    }
}

/// API error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn method_not_allowed(method: &str, allowed: &[&str]) -> Self {
        Self::new(
            "MethodNotAllowed",
            format!("Method {} is not supported for this endpoint", method),
        )
        .with_details(serde_json::json!({ "allowed_methods": allowed }))
    }
}

// Only the error class crosses the wire; the cause stays in the logs.
impl From<&DocsError> for ApiError {
    fn from(err: &DocsError) -> Self {
        Self::new(err.code(), "Internal server error")
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_hides_cause() {
        let err = DocsError::generation("operation GET /secret has no responses");
        let body = ApiError::from(&err);
        assert_eq!(body.error, "GenerationError");
        assert_eq!(body.message, "Internal server error");
        assert!(body.details.is_none());

        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("/secret"));
        assert!(!json.contains("details"));
    }

    #[test]
    fn method_not_allowed_lists_allowed_methods() {
        let body = ApiError::method_not_allowed("POST", &["GET", "HEAD"]);
        assert_eq!(body.error, "MethodNotAllowed");
        assert_eq!(
            body.details,
            Some(serde_json::json!({ "allowed_methods": ["GET", "HEAD"] }))
        );
    }

    #[test]
    fn yaml_errors_become_serialization_errors() {
        let err: DocsError = serde_yaml::from_str::<serde_yaml::Value>("a: [unterminated")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "SerializationError");
        assert!(err.to_string().starts_with("Serialization error: YAML"));
    }
}
