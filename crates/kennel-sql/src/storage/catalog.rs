//! Table catalog.
//!
//! The set of tables is fixed. The catalog records, per table, the canonical
//! columns and the rules the interpreter enforces on insert.

use std::fmt;
use std::str::FromStr;

use kennel_common::{
    BREED_COLUMN, DOGS_COLUMNS, DOGS_TABLE, DOG_NAME_COLUMN, DOG_OWNER_COLUMN, OWNERS_COLUMNS,
    OWNERS_TABLE,
};
use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// One of the tables known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableName {
    /// Dog owners.
    Owners,
    /// Dogs, indexed by breed.
    Dogs,
}

impl TableName {
    /// All tables, in display order.
    pub const ALL: [TableName; 2] = [TableName::Owners, TableName::Dogs];

    /// Resolves an identifier, including aliases, ignoring case.
    pub fn resolve(ident: &str) -> Option<Self> {
        match ident.to_lowercase().as_str() {
            "owners" | "duenos" | "dueños" => Some(TableName::Owners),
            "dogs" | "perros" => Some(TableName::Dogs),
            _ => None,
        }
    }

    /// Returns the canonical name.
    pub fn as_str(self) -> &'static str {
        match self {
            TableName::Owners => OWNERS_TABLE,
            TableName::Dogs => DOGS_TABLE,
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableName {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s).ok_or_else(|| StorageError::UnknownTable(s.to_string()))
    }
}

/// A column taking part in a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueColumn {
    /// Column position in the row.
    pub index: usize,
    /// Compare values case-insensitively.
    pub ignore_case: bool,
}

impl UniqueColumn {
    /// Returns true if two cell values collide under this column's rule.
    pub fn matches(&self, existing: &str, candidate: &str) -> bool {
        if self.ignore_case {
            existing.to_lowercase() == candidate.to_lowercase()
        } else {
            existing == candidate
        }
    }
}

/// A composite uniqueness constraint over stored rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueConstraint {
    /// Constraint name.
    pub name: String,
    /// Columns compared, in order.
    pub columns: Vec<UniqueColumn>,
}

impl UniqueConstraint {
    /// Returns true if `candidate` collides with the stored `row`.
    ///
    /// Stored cells are trimmed before comparison. A row too short to hold
    /// every constrained column never collides.
    pub fn conflicts(&self, row: &[String], candidate: &[String]) -> bool {
        self.columns.iter().all(|column| {
            match (row.get(column.index), candidate.get(column.index)) {
                (Some(existing), Some(value)) => column.matches(existing.trim(), value),
                _ => false,
            }
        })
    }
}

/// Schema and insert rules for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    /// Table name.
    pub name: TableName,
    /// Canonical column names.
    pub columns: Vec<String>,
    /// Column 0 is assigned by the store rather than supplied.
    pub auto_increment: bool,
    /// Uniqueness constraints checked before each insert.
    pub unique: Vec<UniqueConstraint>,
    /// Column covered by the secondary index, if any.
    pub index_column: Option<usize>,
}

impl TableInfo {
    /// Returns the number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns the position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns the column names a caller supplies on insert.
    pub fn input_columns(&self) -> &[String] {
        if self.auto_increment {
            &self.columns[1..]
        } else {
            &self.columns
        }
    }
}

/// Catalog of every table known to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    owners: TableInfo,
    dogs: TableInfo,
}

impl Catalog {
    /// Creates the catalog of the owners and dogs tables.
    pub fn new() -> Self {
        let owners = TableInfo {
            name: TableName::Owners,
            columns: OWNERS_COLUMNS.iter().map(|c| c.to_string()).collect(),
            auto_increment: false,
            unique: Vec::new(),
            index_column: None,
        };

        let dogs = TableInfo {
            name: TableName::Dogs,
            columns: DOGS_COLUMNS.iter().map(|c| c.to_string()).collect(),
            auto_increment: true,
            unique: vec![UniqueConstraint {
                name: "dogs_name_owner".to_string(),
                columns: vec![
                    UniqueColumn {
                        index: DOG_NAME_COLUMN,
                        ignore_case: true,
                    },
                    UniqueColumn {
                        index: DOG_OWNER_COLUMN,
                        ignore_case: false,
                    },
                ],
            }],
            index_column: Some(BREED_COLUMN),
        };

        Self { owners, dogs }
    }

    /// Returns the info for a table.
    pub fn get(&self, name: TableName) -> &TableInfo {
        match name {
            TableName::Owners => &self.owners,
            TableName::Dogs => &self.dogs,
        }
    }

    /// Resolves an identifier and returns the table info.
    pub fn resolve(&self, ident: &str) -> Option<&TableInfo> {
        TableName::resolve(ident).map(|name| self.get(name))
    }

    /// Returns the table carrying the secondary index.
    pub fn indexed_table(&self) -> &TableInfo {
        &self.dogs
    }

    /// Iterates over all tables.
    pub fn tables(&self) -> impl Iterator<Item = &TableInfo> {
        TableName::ALL.into_iter().map(move |name| self.get(name))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
