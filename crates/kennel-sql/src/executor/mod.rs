//! Statement execution.
//!
//! - **Engine**: runs submissions and searches against store snapshots
//! - **ExecutionResult**: per-tuple records plus the new snapshots
//! - **StatementError**: why a statement or tuple was rejected
//!
//! # Example
//!
//! ```
//! use kennel_sql::executor::Engine;
//!
//! let engine = Engine::new();
//! let (store, index) = engine.initial_state();
//!
//! let result = engine.execute(
//!     "INSERT INTO perros VALUES ('Labrador', 'Buddy2', '1');",
//!     &store,
//!     &index,
//! );
//! assert_eq!(result.records.len(), 1);
//! assert!(result.records[0].success);
//!
//! let store = result.store.unwrap();
//! let index = result.index.unwrap();
//! let found = engine.search("Labrador", &index, &store);
//! assert_eq!(found.rows.len(), 2);
//! ```

mod engine;
mod error;
mod result;

pub use engine::{Engine, EngineConfig};
pub use error::{ErrorKind, StatementError, StatementResult};
pub use result::{ExecutionRecord, ExecutionResult, RowMap, SearchResult, StatementOutcome};
