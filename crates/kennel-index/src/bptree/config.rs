//! Configuration for the B+ tree index.

use std::fmt;

use kennel_common::constants::{DEFAULT_INDEX_ORDER, MIN_INDEX_ORDER};
use serde::{Deserialize, Serialize};

use super::error::{IndexError, IndexResult};

/// When nodes are split after an insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitPolicy {
    /// Only an overflowing root is split; deeper nodes are never split.
    #[default]
    RootOnly,
    /// Every overflowing node is split and separators propagate upward.
    Recursive,
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitPolicy::RootOnly => f.write_str("root-only"),
            SplitPolicy::Recursive => f.write_str("recursive"),
        }
    }
}

/// Configuration for a [`BPlusTree`](super::BPlusTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Key count at which a node is split.
    pub order: usize,

    /// Which nodes are checked for overflow.
    pub split_policy: SplitPolicy,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_INDEX_ORDER,
            split_policy: SplitPolicy::RootOnly,
        }
    }
}

impl IndexConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the order.
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Sets the split policy.
    pub fn with_split_policy(mut self, policy: SplitPolicy) -> Self {
        self.split_policy = policy;
        self
    }

    /// Checks that the configuration describes a usable tree.
    pub fn validate(&self) -> IndexResult<()> {
        if self.order < MIN_INDEX_ORDER {
            return Err(IndexError::InvalidOrder {
                order: self.order,
                min: MIN_INDEX_ORDER,
            });
        }
        Ok(())
    }
}
