use crate::models::{CrawlReport, PropertyRecord, CSV_COLUMNS};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Write `records` as CSV to `path`, replacing any existing file
///
/// The header row is always present, even with no records. The parent
/// directory is created if it does not exist.
pub async fn write_csv(records: &[PropertyRecord], path: &Path) -> Result<()> {
    let bytes = encode_csv(records)?;

    ensure_parent_dir(path).await?;
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    info!("💾 Saved {} properties to {}", records.len(), path.display());
    Ok(())
}

fn encode_csv(records: &[PropertyRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV buffer: {}", e))
}

/// Write the crawl report as pretty-printed JSON
pub async fn write_report(report: &CrawlReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    ensure_parent_dir(path).await?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    info!("💾 Saved crawl report to {}", path.display());
    Ok(())
}

async fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create directory: {}", dir.display())),
        _ => Ok(()),
    }
}
