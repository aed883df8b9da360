//! KennelDB Performance Benchmarks
//!
//! This crate contains benchmarks for:
//! - The B+ tree breed index (insert, search, both split policies)
//! - The statement engine (bulk inserts, index rebuilds)
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench -p kennel-bench
//! ```

pub mod utils;
