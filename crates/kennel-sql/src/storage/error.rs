//! Storage error types.

use thiserror::Error;

/// Errors raised while loading table snapshots.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// Table text has no header line.
    #[error("table text has no header line")]
    MissingHeader,

    /// A snapshot lacks one of the tables.
    #[error("snapshot is missing table: {0}")]
    MissingTable(String),

    /// A snapshot holds the same table twice, possibly under two aliases.
    #[error("snapshot holds table {0} more than once")]
    DuplicateTable(String),

    /// A snapshot names a table the catalog does not know.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// A table in a snapshot could not be loaded.
    #[error("invalid table '{table}': {source}")]
    InvalidTable {
        /// Table name.
        table: String,
        /// Underlying error.
        #[source]
        source: Box<StorageError>,
    },
}

/// Storage result type.
pub type StorageResult<T> = Result<T, StorageError>;
