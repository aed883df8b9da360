//! Row identifier type.
//!
//! Row IDs are assigned by the table store and are the values held by the
//! breed index, so they get a dedicated wrapper instead of a bare integer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Row identifier - identifies one stored row of a table.
///
/// Dog IDs are assigned by the store in strictly increasing order starting
/// at 1. Owner IDs are supplied by the caller and are never parsed, so only
/// the dogs table hands out `RowId`s.
///
/// # Example
///
/// ```rust
/// use kennel_common::types::RowId;
///
/// let id: RowId = "104".parse().unwrap();
/// assert_eq!(id.as_u64(), 104);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct RowId(u64);

impl RowId {
    /// First ID handed out by an empty auto-increment table.
    pub const FIRST: Self = Self(1);

    /// Creates a new `RowId` from a raw u64 value.
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw u64 value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the next row ID, or `None` once the ID space is used up.
    #[inline]
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }
}

/// Error returned when a cell is not a row ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRowIdError {
    input: String,
}

impl ParseRowIdError {
    /// Returns the rejected text.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseRowIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid row id: '{}'", self.input)
    }
}

impl std::error::Error for ParseRowIdError {}

impl fmt::Debug for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowId({})", self.0)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RowId {
    type Err = ParseRowIdError;

    /// Parses ASCII decimal digits, ignoring surrounding whitespace. Signs
    /// are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let invalid = || ParseRowIdError {
            input: s.to_string(),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        digits.parse::<u64>().map(Self).map_err(|_| invalid())
    }
}

impl From<u64> for RowId {
    #[inline]
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<RowId> for u64 {
    #[inline]
    fn from(id: RowId) -> Self {
        id.0
    }
}
