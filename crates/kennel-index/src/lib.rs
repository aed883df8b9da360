//! # kennel-index
//!
//! B+ tree secondary index for KennelDB.
//!
//! This crate implements the breed index over the dogs table:
//! - Multi-valued keys (one breed maps to every dog ID that shares it)
//! - Point search that records a step-by-step traversal trace
//! - Wholesale rebuild from table rows or table text

#![warn(missing_docs)]
#![warn(clippy::all)]

/// B+ tree implementation
pub mod bptree;

pub use bptree::{
    BPlusTree, IndexBuilder, IndexConfig, IndexError, IndexResult, Node, SearchOutcome,
    SearchTrace, SplitPolicy, StepKind, TraceStep, TreeStats,
};
