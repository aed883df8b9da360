//! Statement error taxonomy.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use kennel_common::RowId;

use crate::parser::ParseError;
use crate::storage::TableName;

/// Why a statement or tuple was rejected.
///
/// None of these abort a submission. Each one becomes a failed
/// [`ExecutionRecord`](super::ExecutionRecord) whose message is this error's
/// `Display` output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatementError {
    /// The statement does not follow the INSERT grammar.
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),

    /// The table name does not resolve.
    #[error("table '{0}' does not exist")]
    Schema(String),

    /// The tuple has the wrong number of values.
    #[error(
        "column count mismatch for {table}: expected {expected} values ({columns}), received {received}"
    )]
    Arity {
        /// Target table.
        table: TableName,
        /// Values the table takes on insert.
        expected: usize,
        /// Values supplied.
        received: usize,
        /// Comma-separated names of the expected columns.
        columns: String,
    },

    /// The tuple collides with a stored row.
    #[error("uniqueness violation in {table}: {conflict}")]
    Uniqueness {
        /// Target table.
        table: TableName,
        /// Which values collide.
        conflict: String,
    },

    /// The last stored row already holds the largest ID.
    #[error("cannot assign {column} in {table}: no ID follows {last}")]
    IdExhausted {
        /// Target table.
        table: TableName,
        /// Auto-increment column.
        column: String,
        /// ID of the table's last row.
        last: RowId,
    },
}

impl StatementError {
    /// Returns the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StatementError::Syntax(_) => ErrorKind::Syntax,
            StatementError::Schema(_) => ErrorKind::Schema,
            StatementError::Arity { .. } => ErrorKind::Arity,
            StatementError::Uniqueness { .. } => ErrorKind::Uniqueness,
            StatementError::IdExhausted { .. } => ErrorKind::IdExhausted,
        }
    }
}

/// Category of a [`StatementError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Not an INSERT, malformed header, or no tuples.
    Syntax,
    /// Unknown table.
    Schema,
    /// Wrong value count.
    Arity,
    /// Duplicate of a unique key.
    Uniqueness,
    /// No auto-increment ID left.
    IdExhausted,
}

impl ErrorKind {
    /// Returns a short label.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "syntax",
            ErrorKind::Schema => "schema",
            ErrorKind::Arity => "arity",
            ErrorKind::Uniqueness => "uniqueness",
            ErrorKind::IdExhausted => "id_exhausted",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type for statement execution.
pub type StatementResult<T> = Result<T, StatementError>;
