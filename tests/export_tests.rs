/// Tests for the static export tool and the health report
use shared::export::export_documents;
use shared::health::health_report;
use shared::{validate_document, DocsConfig, DocumentFormat, SpecRegistry};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_export_writes_all_documents() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("docs");
    let registry = SpecRegistry::from_config(&DocsConfig::default());

    let written = export_documents(&registry, &out).unwrap();
    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["nile-auth.json", "nile-auth.yaml", "nile-auth-v2.json"]);

    let yaml = fs::read(out.join("nile-auth.yaml")).unwrap();
    let json = fs::read(out.join("nile-auth.json")).unwrap();
    assert_eq!(
        DocumentFormat::Yaml.decode(&yaml).unwrap(),
        DocumentFormat::Json.decode(&json).unwrap()
    );

    let v2 = fs::read(out.join("nile-auth-v2.json")).unwrap();
    let v2: serde_json::Value = serde_json::from_slice(&v2).unwrap();
    assert!(validate_document(&v2).is_ok());
}

#[test]
fn test_export_refuses_broken_documents() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("docs");
    let config = DocsConfig {
        version: String::new(),
        ..DocsConfig::default()
    };
    let registry = SpecRegistry::from_config(&config);

    let err = export_documents(&registry, &out).unwrap_err();
    assert!(format!("{:#}", err).contains("version"));
    assert!(!out.exists());
}

#[test]
fn test_health_reports_both_documents() {
    let registry = SpecRegistry::from_config(&DocsConfig::default());
    let (status, body) = health_report(&registry);

    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert!(body["documents"]["primary"]["paths"].as_u64().unwrap() > 0);
    assert!(
        body["documents"]["v2"]["operations"].as_u64().unwrap()
            < body["documents"]["primary"]["operations"].as_u64().unwrap()
    );
    assert!(body["timestamp"].is_string());
}

#[test]
fn test_health_reports_generation_failure() {
    let config = DocsConfig {
        title: " ".to_string(),
        ..DocsConfig::default()
    };
    let registry = SpecRegistry::from_config(&config);
    let (status, body) = health_report(&registry);

    assert_eq!(status, 503);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["documents"]["primary"]["healthy"], false);
    assert_eq!(body["documents"]["primary"]["error"], "GenerationError");
    assert_eq!(body["documents"]["v2"]["healthy"], true);
}
