//! Type definitions for KennelDB.

mod ids;

pub use ids::{ParseRowIdError, RowId};
