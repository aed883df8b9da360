//! An in-memory B+ tree keyed by text, mapping each key to a list of row IDs.
//!
//! ## Shape
//!
//! ```text
//!                    ┌───────────────┐
//!                    │   [Bulldog]   │            internal: keys + children
//!                    └───┬───────┬───┘
//!          < Bulldog     │       │    >= Bulldog
//!        ┌───────────────┘       └──────────────────┐
//!  ┌─────┴──────────────┐            ┌──────────────┴─────────────┐
//!  │ Beagle  → [102]    │            │ Bulldog  → [103]           │  leaf: keys +
//!  │ Boxer   → [105]    │            │ Labrador → [101, 104]      │  row-ID lists
//!  └────────────────────┘            └────────────────────────────┘
//! ```
//!
//! Keys inside a node are distinct and strictly increasing. Child `i` of an
//! internal node holds keys in `[keys[i-1], keys[i])`.
//!
//! ## Split policy
//!
//! By default only the root is checked for overflow after an insert
//! ([`SplitPolicy::RootOnly`]). Once the root has split, leaves below it grow
//! without bound, so the tree is at most two levels deep. This keeps the
//! structure small enough to display.
//! [`SplitPolicy::Recursive`] performs the usual bottom-up splits instead.
//!
//! ## Usage
//!
//! ```rust
//! use kennel_common::RowId;
//! use kennel_index::{BPlusTree, StepKind};
//!
//! let mut tree = BPlusTree::new();
//! tree.insert("Labrador", RowId::new(101));
//! tree.insert("Beagle", RowId::new(102));
//! tree.insert("Labrador", RowId::new(104));
//!
//! let outcome = tree.search("Labrador");
//! assert_eq!(outcome.row_ids, vec![RowId::new(101), RowId::new(104)]);
//! assert_eq!(outcome.trace.steps()[0].kind, StepKind::Root);
//! ```

mod builder;
mod config;
mod error;
mod node;
mod trace;
mod tree;

pub use builder::IndexBuilder;
pub use config::{IndexConfig, SplitPolicy};
pub use error::{IndexError, IndexResult};
pub use node::{InternalNode, LeafNode, Node};
pub use trace::{SearchTrace, StepKind, TraceStep};
pub use tree::{BPlusTree, SearchOutcome, TreeStats};
