//! Node types for the B+ tree.
//!
//! A node is either a leaf (keys plus one row-ID list per key) or an internal
//! node (keys plus `keys.len() + 1` children). Both keep their keys sorted and
//! free of duplicates.

use kennel_common::RowId;
use serde::{Deserialize, Serialize};

/// A B+ tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Leaf node holding row-ID lists.
    Leaf(LeafNode),
    /// Internal node routing to children.
    Internal(InternalNode),
}

impl Node {
    /// Returns the node's keys.
    pub fn keys(&self) -> &[String] {
        match self {
            Node::Leaf(leaf) => &leaf.keys,
            Node::Internal(internal) => &internal.keys,
        }
    }

    /// Returns the number of keys in this node.
    pub fn key_count(&self) -> usize {
        self.keys().len()
    }

    /// Returns true if this is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Number of levels from this node down to its leftmost leaf.
    pub fn height(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Internal(internal) => {
                1 + internal.children.first().map_or(0, Node::height)
            }
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::Leaf(LeafNode::new())
    }
}

// =============================================================================
// Leaf
// =============================================================================

/// Leaf node: `values[i]` lists the row IDs stored under `keys[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafNode {
    /// Sorted, distinct keys.
    pub keys: Vec<String>,
    /// Row IDs per key, in insertion order.
    pub values: Vec<Vec<RowId>>,
}

impl LeafNode {
    /// Creates an empty leaf.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the leaf has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Binary search for a key.
    pub fn search(&self, key: &str) -> Result<usize, usize> {
        self.keys.binary_search_by(|k| k.as_str().cmp(key))
    }

    /// Returns the row IDs stored under `key`.
    pub fn get(&self, key: &str) -> Option<&[RowId]> {
        self.search(key).ok().map(|idx| self.values[idx].as_slice())
    }

    /// Adds `row_id` under `key`.
    ///
    /// An existing key gets the ID appended to its list; a new key is placed
    /// at its sorted position with a singleton list. Returns true if the key
    /// was new.
    pub fn insert(&mut self, key: String, row_id: RowId) -> bool {
        match self.search(&key) {
            Ok(idx) => {
                self.values[idx].push(row_id);
                false
            }
            Err(idx) => {
                self.keys.insert(idx, key);
                self.values.insert(idx, vec![row_id]);
                true
            }
        }
    }

    /// Splits this leaf at `len / 2`.
    ///
    /// `self` keeps the lower half. The returned separator is the first key
    /// of the upper half, which keeps it (all keys live in leaves).
    pub fn split(&mut self) -> (String, LeafNode) {
        let split_point = self.keys.len() / 2;
        let right = LeafNode {
            keys: self.keys.split_off(split_point),
            values: self.values.split_off(split_point),
        };
        let separator = right.keys[0].clone();
        (separator, right)
    }

    /// Total number of row IDs held by this leaf.
    pub fn entry_count(&self) -> usize {
        self.values.iter().map(Vec::len).sum()
    }
}

// =============================================================================
// Internal
// =============================================================================

/// Internal node: child `i` covers keys in `[keys[i-1], keys[i])`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalNode {
    /// Sorted, distinct separator keys.
    pub keys: Vec<String>,
    /// `keys.len() + 1` children.
    pub children: Vec<Node>,
}

impl InternalNode {
    /// Creates a node with one separator and two children.
    pub fn from_split(left: Node, separator: String, right: Node) -> Self {
        Self {
            keys: vec![separator],
            children: vec![left, right],
        }
    }

    /// Index of the child that covers `key`.
    ///
    /// This is the smallest `i` with `key < keys[i]`, or `keys.len()` when
    /// the key is not below any separator.
    pub fn child_index(&self, key: &str) -> usize {
        self.keys.partition_point(|k| k.as_str() <= key)
    }

    /// Human-readable key range covered by child `i`.
    pub fn branch_range(&self, i: usize) -> String {
        if self.keys.is_empty() {
            return "all keys".to_string();
        }
        if i == 0 {
            format!("< {}", self.keys[0])
        } else if i >= self.keys.len() {
            format!(">= {}", self.keys[self.keys.len() - 1])
        } else {
            format!("{} <= key < {}", self.keys[i - 1], self.keys[i])
        }
    }

    /// Places a separator produced by splitting child `idx`.
    pub fn insert_split(&mut self, idx: usize, separator: String, right: Node) {
        self.keys.insert(idx, separator);
        self.children.insert(idx + 1, right);
    }

    /// Splits this node at `len / 2`.
    ///
    /// The middle key moves up as the separator and is kept by neither half,
    /// so both halves keep `children == keys + 1`.
    pub fn split(&mut self) -> (String, InternalNode) {
        let split_point = self.keys.len() / 2;
        let right_keys = self.keys.split_off(split_point + 1);
        let right_children = self.children.split_off(split_point + 1);
        let separator = self.keys.pop().unwrap_or_default();
        let right = InternalNode {
            keys: right_keys,
            children: right_children,
        };
        (separator, right)
    }
}
