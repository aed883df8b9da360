//! Wholesale index construction from table rows.

use kennel_common::{RowId, CELL_SEPARATOR, ROW_SEPARATOR};
use tracing::debug;

use super::config::IndexConfig;
use super::error::IndexResult;
use super::tree::BPlusTree;

/// Builds a fresh [`BPlusTree`] from `(id, key)` pairs.
///
/// The index is never patched incrementally; callers discard the old tree
/// and build a new one from the current table contents.
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    config: IndexConfig,
}

impl IndexBuilder {
    /// Creates a builder, validating the configuration up front.
    pub fn new(config: IndexConfig) -> IndexResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration trees are built with.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Builds a tree from `(row id, key)` pairs in the given order.
    ///
    /// Rows whose ID is not an integer, or whose key is blank, are skipped.
    pub fn build_from_rows<'a, I>(&self, rows: I) -> BPlusTree
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut tree = BPlusTree::empty(self.config);
        let mut skipped = 0usize;

        for (id, key) in rows {
            let key = key.trim();
            match id.parse::<RowId>() {
                Ok(row_id) if !key.is_empty() => tree.insert(key, row_id),
                _ => skipped += 1,
            }
        }

        debug!(
            keys = tree.len(),
            height = tree.height(),
            skipped,
            "rebuilt breed index"
        );
        tree
    }

    /// Builds a tree from dogs-table text: a header line, then
    /// `dog_id,breed,...` rows.
    ///
    /// Blank lines and rows with fewer than two cells are skipped.
    pub fn build_from_text(&self, content: &str) -> BPlusTree {
        let rows = content
            .trim()
            .split(ROW_SEPARATOR)
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| {
                let mut cells = line.split(CELL_SEPARATOR);
                Some((cells.next()?, cells.next()?))
            });
        self.build_from_rows(rows)
    }
}
