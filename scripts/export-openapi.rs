//! Export the published OpenAPI documents to static files
//!
//! Usage: cargo run --bin export-openapi -- --out docs
//!
//! Writes nile-auth.json, nile-auth.yaml and nile-auth-v2.json for SDK
//! generation and API linting. Fails without writing anything if a document
//! does not validate.

use clap::Parser;
use shared::{export::export_documents, DocsConfig, SpecRegistry};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "export-openapi", about = "Export nile-auth OpenAPI documents")]
struct Cli {
    /// Output directory
    #[arg(short, long, default_value = "docs", env = "NILE_AUTH_DOCS_OUT")]
    out: PathBuf,

    /// Override the document version
    #[arg(long)]
    version: Option<String>,
}

fn main() -> anyhow::Result<()> {
    shared::logging::init();
    let cli = Cli::parse();

    let mut config = DocsConfig::from_env();
    if let Some(version) = cli.version {
        config.version = version;
    }

    let registry = SpecRegistry::from_config(&config);
    for path in export_documents(&registry, &cli.out)? {
        println!("Exported {}", path.display());
    }
    Ok(())
}
