//! Table storage.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Engine                              │
//! │   (validates tuples, assigns IDs, rebuilds the breed index)  │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Storage layer                            │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐          │
//! │  │   Catalog   │  │    Store    │  │    Table    │          │
//! │  │  (schemas,  │  │ (snapshot,  │  │ (header +   │          │
//! │  │   rules)    │  │  COW)       │  │  rows/text) │          │
//! │  └─────────────┘  └─────────────┘  └─────────────┘          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod catalog;
mod error;
mod store;
mod table;

pub use catalog::{Catalog, TableInfo, TableName, UniqueColumn, UniqueConstraint};
pub use error::{StorageError, StorageResult};
pub use store::Store;
pub use table::Table;
