//! # kennel-common
//!
//! Common types and constants for KennelDB.
//!
//! This crate provides the foundational pieces shared by the index, the
//! statement interpreter, and the CLI:
//!
//! - **Types**: the `RowId` identifier assigned to stored rows
//! - **Constants**: table names, column layouts, and index defaults
//!
//! ## Example
//!
//! ```rust
//! use kennel_common::types::RowId;
//!
//! let id = RowId::new(101);
//! assert_eq!(id.checked_next(), Some(RowId::new(102)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::{ParseRowIdError, RowId};
