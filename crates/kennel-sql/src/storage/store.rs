//! Table store snapshots.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, TableName};
use super::error::{StorageError, StorageResult};
use super::table::Table;

const SEED_OWNERS: [[&str; 2]; 3] = [
    ["1", "Juan Perez"],
    ["2", "Maria Garcia"],
    ["3", "Carlos Lopez"],
];

const SEED_DOGS: [[&str; 4]; 3] = [
    ["101", "Labrador", "Buddy", "1"],
    ["102", "Beagle", "Luna", "2"],
    ["103", "Bulldog", "Rocky", "1"],
];

/// A snapshot of every table.
///
/// Cloning is cheap: tables are shared until one is modified, and a write
/// copies only the table it touches. A store handed to the engine is never
/// changed; the engine returns a new one instead.
///
/// Serializes as a map from table name to table text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct Store {
    owners: Arc<Table>,
    dogs: Arc<Table>,
}

impl Store {
    /// Creates a store with empty tables using the catalog headers.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            owners: Arc::new(Table::new(catalog.get(TableName::Owners).columns.clone())),
            dogs: Arc::new(Table::new(catalog.get(TableName::Dogs).columns.clone())),
        }
    }

    /// Returns the initial snapshot: three owners and three dogs.
    pub fn seed() -> Self {
        let mut store = Self::new(&Catalog::new());

        let owners = store.table_mut(TableName::Owners);
        for row in SEED_OWNERS {
            owners.push_row(row.map(String::from).to_vec());
        }

        let dogs = store.table_mut(TableName::Dogs);
        for row in SEED_DOGS {
            dogs.push_row(row.map(String::from).to_vec());
        }

        store
    }

    /// Loads a store from `(table name, table text)` pairs.
    ///
    /// Names may use any alias the catalog accepts. Every table must be
    /// present exactly once.
    pub fn from_texts<I, K, V>(tables: I) -> StorageResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut owners = None;
        let mut dogs = None;

        for (key, text) in tables {
            let key = key.as_ref();
            let name: TableName = key.parse()?;
            let table = Table::parse(text.as_ref()).map_err(|e| StorageError::InvalidTable {
                table: key.to_string(),
                source: Box::new(e),
            })?;
            let slot = match name {
                TableName::Owners => &mut owners,
                TableName::Dogs => &mut dogs,
            };
            if slot.replace(table).is_some() {
                return Err(StorageError::DuplicateTable(name.as_str().to_string()));
            }
        }

        Ok(Self {
            owners: Arc::new(owners.ok_or_else(|| missing(TableName::Owners))?),
            dogs: Arc::new(dogs.ok_or_else(|| missing(TableName::Dogs))?),
        })
    }

    /// Returns every table's text, keyed by canonical name.
    pub fn to_texts(&self) -> BTreeMap<String, String> {
        TableName::ALL
            .into_iter()
            .map(|name| (name.as_str().to_string(), self.table(name).to_text()))
            .collect()
    }

    /// Returns a table.
    pub fn table(&self, name: TableName) -> &Table {
        match name {
            TableName::Owners => &self.owners,
            TableName::Dogs => &self.dogs,
        }
    }

    /// Returns a table for writing, copying it first if it is shared.
    pub fn table_mut(&mut self, name: TableName) -> &mut Table {
        match name {
            TableName::Owners => Arc::make_mut(&mut self.owners),
            TableName::Dogs => Arc::make_mut(&mut self.dogs),
        }
    }

    /// Returns true if both snapshots share the given table's storage.
    pub fn shares_table(&self, other: &Store, name: TableName) -> bool {
        match name {
            TableName::Owners => Arc::ptr_eq(&self.owners, &other.owners),
            TableName::Dogs => Arc::ptr_eq(&self.dogs, &other.dogs),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::seed()
    }
}

impl TryFrom<BTreeMap<String, String>> for Store {
    type Error = StorageError;

    fn try_from(tables: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        Self::from_texts(tables)
    }
}

impl From<Store> for BTreeMap<String, String> {
    fn from(store: Store) -> Self {
        store.to_texts()
    }
}

fn missing(name: TableName) -> StorageError {
    StorageError::MissingTable(name.as_str().to_string())
}
