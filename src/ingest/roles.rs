use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::models::RoleTable;

/// Header names accepted for the identity column, in lookup order.
const IDENTITY_HEADERS: [&str; 3] = ["speaker", "id", "name"];
const ROLE_HEADER: &str = "role";

/// Load the role table from a CSV side file.
///
/// A missing file yields an empty table. A file that cannot be parsed as
/// CSV (including rows with the wrong number of fields) yields an empty
/// table with a warning. Duplicate identities resolve to the last row.
pub fn load_roles(path: &Path) -> Result<RoleTable> {
    if !path.exists() {
        info!("No role table at {}", path.display());
        return Ok(RoleTable::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read role table: {}", path.display()))?;

    match parse_roles(&content) {
        Ok(table) => Ok(table),
        Err(e) => {
            warn!("Malformed role table {}: {e}; continuing without roles", path.display());
            Ok(RoleTable::new())
        }
    }
}

/// Parse role-table CSV content with a header row.
pub fn parse_roles(content: &str) -> Result<RoleTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let identity_cols: Vec<usize> = IDENTITY_HEADERS.iter().filter_map(|h| column(h)).collect();
    let role_col = column(ROLE_HEADER);

    let mut table = RoleTable::new();
    for record in reader.records() {
        let record = record?;
        // First non-empty identity column wins for each row
        let identity = identity_cols
            .iter()
            .filter_map(|&i| record.get(i))
            .map(str::trim)
            .find(|v| !v.is_empty());
        let Some(identity) = identity else {
            continue;
        };
        let role = role_col.and_then(|i| record.get(i)).unwrap_or("").trim();
        table.insert(identity, role);
    }

    Ok(table)
}
