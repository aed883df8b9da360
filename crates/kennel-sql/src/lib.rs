//! # kennel-sql
//!
//! Statement interpreter for KennelDB.
//!
//! This crate implements:
//! - Statement splitting and the INSERT-only grammar
//! - The owners/dogs table catalog and copy-on-write store snapshots
//! - Per-tuple validation (arity, uniqueness) with auto-increment IDs
//! - Breed index rebuilds and traced breed search

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Statement splitter and INSERT parser
pub mod parser;

/// Tables, catalog, and store snapshots
pub mod storage;

/// Statement execution
pub mod executor;

pub use executor::{
    Engine, EngineConfig, ErrorKind, ExecutionRecord, ExecutionResult, RowMap, SearchResult,
    StatementError,
};
pub use parser::{InsertStatement, ParseError, Parser};
pub use storage::{Catalog, Store, StorageError, Table, TableName};
