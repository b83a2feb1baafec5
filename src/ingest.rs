//! File ingestion for `cwb ingest`.
//!
//! The file extension picks the format: `.csv` goes through the same parser
//! as the multipart upload, `.json` must hold an array of interactions as
//! accepted by `POST /api/interactions/bulk`.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

use customer_workbench_core::models::InteractionDto;

use crate::config::Config;
use crate::db;

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(FileFormat::Csv),
            Some("json") => Ok(FileFormat::Json),
            _ => bail!(
                "Unsupported file type: {} (expected .csv or .json)",
                path.display()
            ),
        }
    }
}

/// Reads `path` and stores every interaction in it. All or nothing.
pub async fn run_ingest(config: &Config, path: &Path) -> Result<()> {
    let format = FileFormat::from_path(path)?;
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    let service = db::open_service(config).await?;
    let ingested = match format {
        FileFormat::Csv => service.ingest_csv(&bytes).await?,
        FileFormat::Json => {
            let items: Vec<InteractionDto> = serde_json::from_slice(&bytes)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?;
            service.ingest_json(items).await?
        }
    };

    info!(ingested, file = %path.display(), "ingestion complete");
    println!("ingested: {}", ingested);
    Ok(())
}
