//! Row-oriented table content and its text form.
//!
//! The text form is a header line followed by one line per row, cells joined
//! with `,` and lines with `\n`. Nothing is quoted or escaped, so a cell that
//! contains a comma does not survive a round trip.

use std::fmt;

use kennel_common::{RowId, CELL_SEPARATOR, ROW_SEPARATOR};

use super::error::{StorageError, StorageResult};

/// A header plus ordered rows of string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given header.
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Parses the text form.
    ///
    /// Blank lines are skipped. Every other line is kept byte for byte, so
    /// cells with leading or trailing spaces survive a round trip.
    pub fn parse(text: &str) -> StorageResult<Self> {
        let mut lines = text
            .split(ROW_SEPARATOR)
            .filter(|line| !line.trim().is_empty());

        let header = lines.next().ok_or(StorageError::MissingHeader)?;

        Ok(Self {
            header: split_line(header),
            rows: lines.map(split_line).collect(),
        })
    }

    /// Renders the text form.
    pub fn to_text(&self) -> String {
        let separator = CELL_SEPARATOR.to_string();
        std::iter::once(&self.header)
            .chain(&self.rows)
            .map(|cells| cells.join(&separator))
            .collect::<Vec<_>>()
            .join(&ROW_SEPARATOR.to_string())
    }

    /// Returns the header cells.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Returns the number of header cells.
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Returns the data rows in insertion order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the last data row.
    pub fn last_row(&self) -> Option<&[String]> {
        self.rows.last().map(Vec::as_slice)
    }

    /// Returns the position of a header column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim() == name)
    }

    /// Returns the ID that follows the last row's first cell, or
    /// [`RowId::FIRST`] if the table is empty or that cell is not an integer.
    ///
    /// Returns `None` when the last row already holds the largest ID.
    pub fn next_row_id(&self) -> Option<RowId> {
        match self
            .last_row()
            .and_then(|row| row.first())
            .and_then(|cell| cell.parse::<RowId>().ok())
        {
            Some(last) => last.checked_next(),
            None => Some(RowId::FIRST),
        }
    }

    /// Appends a row.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

fn split_line(line: &str) -> Vec<String> {
    line.split(CELL_SEPARATOR).map(str::to_string).collect()
}
