use crate::builder::CachedSpec;
use crate::formats::{Delivery, DocumentFormat};
use crate::registry::SpecRegistry;
use crate::validate::validate_document;
use anyhow::{anyhow, Context};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write every published document into `dir`, validating each first.
///
/// Nothing is written unless all documents are valid.
pub fn export_documents(registry: &SpecRegistry, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let outputs = [
        ("nile-auth", &registry.primary, DocumentFormat::Json),
        ("nile-auth", &registry.primary, DocumentFormat::Yaml),
        ("nile-auth-v2", &registry.v2, DocumentFormat::Json),
    ];

    let mut rendered = Vec::with_capacity(outputs.len());
    for (stem, spec, format) in outputs {
        let name = format!("{stem}.{}", format.extension());
        let payload = render(spec, format).with_context(|| format!("rendering {name}"))?;
        rendered.push((name, payload));
    }

    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut written = Vec::with_capacity(rendered.len());
    for (name, payload) in rendered {
        let path = dir.join(name);
        fs::write(&path, payload).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "Exported OpenAPI document");
        written.push(path);
    }
    Ok(written)
}

fn render(spec: &CachedSpec, format: DocumentFormat) -> anyhow::Result<Vec<u8>> {
    let delivery = Delivery {
        format,
        attachment_filename: None,
    };
    let envelope = crate::formats::serve(spec, &delivery)?;

    let decoded = format.decode_value(&envelope.payload)?;
    if let Err(issues) = validate_document(&decoded) {
        let listed: Vec<String> = issues.iter().map(ToString::to_string).collect();
        return Err(anyhow!("invalid OpenAPI document:\n  {}", listed.join("\n  ")));
    }
    Ok(envelope.payload)
}
