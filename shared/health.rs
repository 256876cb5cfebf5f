use crate::builder::CachedSpec;
use crate::registry::SpecRegistry;
use serde::Serialize;
use serde_json::json;

/// Build state of one published document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentHealth {
    pub title: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn document_health(spec: &CachedSpec) -> DocumentHealth {
    let title = spec.builder().metadata().title.clone();
    match spec.get() {
        Ok(document) => DocumentHealth {
            title,
            healthy: true,
            paths: Some(document.paths.len()),
            operations: Some(document.operation_count()),
            error: None,
        },
        Err(err) => DocumentHealth {
            title,
            healthy: false,
            paths: None,
            operations: None,
            error: Some(err.code().to_string()),
        },
    }
}

/// Status code and body for the health endpoint
pub fn health_report(registry: &SpecRegistry) -> (u16, serde_json::Value) {
    let primary = document_health(&registry.primary);
    let v2 = document_health(&registry.v2);
    let healthy = primary.healthy && v2.healthy;

    let body = json!({
        "status": if healthy { "healthy" } else { "unhealthy" },
        "service": "nile-auth-docs",
        "environment": "serverless",
        "documents": {
            "primary": primary,
            "v2": v2,
        },
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    (if healthy { 200 } else { 503 }, body)
}
