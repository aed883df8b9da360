//! Error types for the B+ tree index.

use thiserror::Error;

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors that can occur when configuring or checking the index.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    /// The configured order cannot produce two non-empty halves on split.
    #[error("invalid index order: {order} (min: {min})")]
    InvalidOrder {
        /// Requested order.
        order: usize,
        /// Smallest accepted order.
        min: usize,
    },

    /// A structural invariant of the tree does not hold.
    #[error("tree structure error: {0}")]
    TreeStructureError(String),
}

impl IndexError {
    /// Creates a new tree structure error.
    pub fn structure_error(msg: impl Into<String>) -> Self {
        Self::TreeStructureError(msg.into())
    }
}
