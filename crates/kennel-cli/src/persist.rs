//! Snapshot files.
//!
//! A snapshot is a JSON object mapping each table name to its text form.
//! Only the tables are stored; the index is rebuilt after loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use kennel_sql::{Store, TableName};
use tracing::debug;

/// Loads a snapshot. Returns `None` if the file does not exist.
pub fn load_store(path: &Path) -> Result<Option<Store>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let store: Store = serde_json::from_str(&content)
        .with_context(|| format!("invalid snapshot {}", path.display()))?;

    debug!(path = %path.display(), "loaded snapshot");
    Ok(Some(store))
}

/// Writes a snapshot, creating parent directories as needed.
pub fn save_store(path: &Path, store: &Store) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(store)?;
    fs::write(path, content)
        .with_context(|| format!("failed to write snapshot {}", path.display()))?;

    debug!(path = %path.display(), "saved snapshot");
    Ok(())
}

/// Writes one table's text form to a file.
pub fn export_table(store: &Store, table: TableName, path: &Path) -> Result<()> {
    fs::write(path, store.table(table).to_text())
        .with_context(|| format!("failed to export {table} to {}", path.display()))
}
