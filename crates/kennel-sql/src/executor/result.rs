//! Execution and search results.

use std::time::Duration;

use kennel_common::RowId;
use kennel_index::{BPlusTree, SearchTrace};
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::error::{ErrorKind, StatementError};
use crate::storage::Store;

/// Outcome of one tuple, or of a statement rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ExecutionRecord {
    /// Echo of the command this record describes.
    pub command: String,
    /// Whether the row was stored.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// ID assigned by an auto-increment table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_id: Option<RowId>,
    /// Error category on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
}

impl ExecutionRecord {
    /// Creates a success record.
    pub fn success(
        command: impl Into<String>,
        message: impl Into<String>,
        assigned_id: Option<RowId>,
    ) -> Self {
        Self {
            command: command.into(),
            success: true,
            message: message.into(),
            assigned_id,
            error: None,
        }
    }

    /// Creates a failure record from an error.
    pub fn failure(command: impl Into<String>, error: &StatementError) -> Self {
        Self {
            command: command.into(),
            success: false,
            message: error.to_string(),
            assigned_id: None,
            error: Some(error.kind()),
        }
    }
}

/// Result of one call to [`Engine::execute`](super::Engine::execute).
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// One record per tuple, or per rejected statement, in order.
    pub records: Vec<ExecutionRecord>,
    /// New store snapshot. Present only if at least one row was stored.
    pub store: Option<Store>,
    /// New index snapshot. Present only if at least one row was stored.
    pub index: Option<BPlusTree>,
    /// Wall time spent executing.
    pub elapsed: Duration,
}

impl ExecutionResult {
    /// Returns true if any row was stored.
    pub fn is_mutated(&self) -> bool {
        self.store.is_some()
    }

    /// Returns the number of successful records.
    pub fn success_count(&self) -> usize {
        self.records.iter().filter(|r| r.success).count()
    }

    /// Returns the number of failed records.
    pub fn failure_count(&self) -> usize {
        self.records.len() - self.success_count()
    }

    /// Returns the IDs assigned during this execution, in order.
    pub fn assigned_ids(&self) -> Vec<RowId> {
        self.records.iter().filter_map(|r| r.assigned_id).collect()
    }
}

/// Records and state changes produced by a single statement.
#[derive(Debug, Clone, Default)]
pub struct StatementOutcome {
    /// Records in tuple order.
    pub records: Vec<ExecutionRecord>,
    /// Rows stored.
    pub applied: usize,
    /// Index rebuilt after the last stored row of the indexed table.
    pub index: Option<BPlusTree>,
}

impl StatementOutcome {
    /// Creates the outcome of a statement rejected before any tuple ran.
    pub fn rejected(command: impl Into<String>, error: &StatementError) -> Self {
        Self {
            records: vec![ExecutionRecord::failure(command, error)],
            ..Self::default()
        }
    }
}

/// A row as ordered `(column, value)` pairs.
///
/// Serializes as a map that keeps column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowMap(Vec<(String, String)>);

impl RowMap {
    /// Pairs header cells with row cells. Missing cells become empty strings.
    pub fn from_row(header: &[String], row: &[String]) -> Self {
        Self(
            header
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let value = row.get(i).map_or("", |cell| cell.trim());
                    (column.trim().to_string(), value.to_string())
                })
                .collect(),
        )
    }

    /// Returns the value of a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the values in order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, value)| value.as_str())
    }

    /// Returns the pairs in order.
    pub fn iter(&self) -> std::slice::Iter<'_, (String, String)> {
        self.0.iter()
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for RowMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (column, value) in &self.0 {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Result of a breed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// IDs returned by the index.
    pub row_ids: Vec<RowId>,
    /// Matching rows in table order.
    pub rows: Vec<RowMap>,
    /// Index traversal trace.
    pub trace: SearchTrace,
}
