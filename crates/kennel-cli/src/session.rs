//! The caller that owns the current snapshots.
//!
//! The engine is a pure function of its inputs. A session holds the latest
//! store and index, swaps in the snapshots each submission returns, and
//! takes care of loading and saving them.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use kennel_index::BPlusTree;
use kennel_sql::{Engine, EngineConfig, ExecutionResult, SearchResult, Store, TableName};
use tracing::{debug, info, warn};

use crate::config::CliConfig;
use crate::persist;

/// Outcome of one submission run through a [`Session`].
#[derive(Debug)]
pub struct Submission {
    /// The engine's result log.
    pub result: ExecutionResult,
    /// Set when the rows were stored but the autosave failed.
    pub save_error: Option<anyhow::Error>,
}

/// The store and index currently shown to the user.
pub struct Session {
    engine: Engine,
    store: Store,
    index: BPlusTree,
    data_file: Option<PathBuf>,
    autosave: bool,
}

impl Session {
    /// Opens a session, loading the snapshot file if one is configured and
    /// present, otherwise starting from the seed tables.
    pub fn open(config: &CliConfig) -> Result<Self> {
        let engine = Engine::with_config(EngineConfig::new().with_index(config.index))?;

        let loaded = match &config.data_file {
            Some(path) => persist::load_store(path)?,
            None => None,
        };
        let store = match loaded {
            Some(store) => store,
            None => {
                info!("starting from seed tables");
                Store::seed()
            }
        };
        let index = engine.rebuild_index(&store);

        Ok(Self {
            engine,
            store,
            index,
            data_file: config.data_file.clone(),
            autosave: config.autosave,
        })
    }

    /// Runs a submission and adopts the snapshots it returns.
    ///
    /// The result log is always returned. A failed autosave is reported
    /// beside it, and the new rows stay in memory until the next save.
    pub fn execute(&mut self, sql: &str) -> Submission {
        let mut result = self.engine.execute(sql, &self.store, &self.index);
        let mut save_error = None;

        if let Some(index) = result.index.take() {
            self.index = index;
        }
        if let Some(store) = &result.store {
            self.store = store.clone();
            if self.autosave && self.data_file.is_some() {
                if let Err(e) = self.save() {
                    warn!("autosave failed: {e:#}");
                    save_error = Some(e);
                }
            }
        }

        Submission { result, save_error }
    }

    /// Searches the breed index.
    pub fn search(&self, term: &str) -> SearchResult {
        self.engine.search(term, &self.index, &self.store)
    }

    /// Discards every change and returns to the seed tables.
    pub fn reset(&mut self) -> Result<()> {
        let (store, index) = self.engine.initial_state();
        self.store = store;
        self.index = index;
        debug!("session reset");

        if self.autosave && self.data_file.is_some() {
            self.save()?;
        }
        Ok(())
    }

    /// Writes the store to the snapshot file and returns its path.
    pub fn save(&self) -> Result<&Path> {
        let Some(path) = self.data_file.as_deref() else {
            bail!("no data file configured (use --data or set data_file)");
        };
        persist::save_store(path, &self.store)?;
        Ok(path)
    }

    /// Writes one table's text to `path`.
    pub fn export(&self, table: TableName, path: &Path) -> Result<()> {
        persist::export_table(&self.store, table, path)
    }

    /// Returns the engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Returns the current store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Returns the current index.
    pub fn index(&self) -> &BPlusTree {
        &self.index
    }

    /// Returns the snapshot file, if any.
    pub fn data_file(&self) -> Option<&Path> {
        self.data_file.as_deref()
    }
}
