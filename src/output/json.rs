use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use super::OutputShape;
use crate::models::{ActionRecord, LooseRecord, ReducedRecord};

/// Pretty-print any serializable value as JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Render records as a pretty-printed JSON array in the given shape.
pub fn render_records(records: &[ActionRecord], shape: OutputShape) -> Result<String> {
    let json = match shape {
        OutputShape::Full => serde_json::to_string_pretty(records)?,
        OutputShape::Reduced => {
            let reduced: Vec<ReducedRecord> = records.iter().map(ReducedRecord::from).collect();
            serde_json::to_string_pretty(&reduced)?
        }
    };
    Ok(json)
}

/// Write records to `path`, creating parent directories as needed.
pub fn write_records(path: &Path, records: &[ActionRecord], shape: OutputShape) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let json = render_records(records, shape)?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write: {}", path.display()))?;
    info!("Wrote {} records ({shape}) to {}", records.len(), path.display());
    Ok(())
}

/// Read a full-shape output file back into records.
pub fn read_records(path: &Path) -> Result<Vec<ActionRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse: {}", path.display()))
}

/// Read any record file (full, reduced, or hand-labeled) with every field optional.
pub fn read_loose(path: &Path) -> Result<Vec<LooseRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse: {}", path.display()))
}
