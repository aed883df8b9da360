//! Main B+ tree implementation.
//!
//! The tree is a plain value: cloning it yields an independent snapshot, and
//! searching never mutates it, so a snapshot can be shared read-only with any
//! number of observers.

use kennel_common::RowId;
use serde::Serialize;
use tracing::trace;

use super::config::{IndexConfig, SplitPolicy};
use super::error::{IndexError, IndexResult};
use super::node::{InternalNode, LeafNode, Node};
use super::trace::{format_keys, SearchTrace, StepKind};

/// Statistics about the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    /// Number of distinct keys.
    pub key_count: usize,
    /// Number of row IDs across all keys.
    pub entry_count: usize,
    /// Number of leaf nodes.
    pub leaf_count: usize,
    /// Number of internal nodes.
    pub internal_count: usize,
    /// Levels from root to leaf (1 = single leaf).
    pub height: usize,
    /// Largest key count found in any leaf.
    pub max_leaf_keys: usize,
}

/// Result of a traced search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Row IDs stored under the key, in insertion order. Empty if absent.
    pub row_ids: Vec<RowId>,
    /// Path the search took.
    pub trace: SearchTrace,
}

/// An in-memory B+ tree mapping text keys to row-ID lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BPlusTree {
    /// Root node; starts as an empty leaf.
    root: Node,
    /// Order and split policy.
    #[serde(flatten)]
    config: IndexConfig,
}

impl BPlusTree {
    /// Creates an empty tree with the default configuration.
    pub fn new() -> Self {
        Self::empty(IndexConfig::default())
    }

    /// Creates an empty tree with the given configuration.
    pub fn with_config(config: IndexConfig) -> IndexResult<Self> {
        config.validate()?;
        Ok(Self::empty(config))
    }

    /// Creates an empty tree from an already validated configuration.
    pub(crate) fn empty(config: IndexConfig) -> Self {
        Self {
            root: Node::default(),
            config,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Returns the order.
    pub fn order(&self) -> usize {
        self.config.order
    }

    /// Returns the root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Levels from root to leaf (1 = the root is a leaf).
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// Returns true if no key has been inserted.
    pub fn is_empty(&self) -> bool {
        match &self.root {
            Node::Leaf(leaf) => leaf.is_empty(),
            Node::Internal(_) => false,
        }
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.stats().key_count
    }

    /// Returns all keys in ascending order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        collect_keys(&self.root, &mut keys);
        keys
    }

    // =========================================================================
    // Core Operations
    // =========================================================================

    /// Returns the row IDs stored under `key`, without recording a trace.
    pub fn get(&self, key: &str) -> Option<&[RowId]> {
        leaf_for(&self.root, key).get(key)
    }

    /// Adds `row_id` under `key`.
    ///
    /// After the leaf insert, overflow is handled according to the split
    /// policy. Under [`SplitPolicy::RootOnly`] only the root is split, and
    /// only once its key count reaches the order.
    pub fn insert(&mut self, key: impl Into<String>, row_id: RowId) {
        let key = key.into();
        let order = self.config.order;

        match self.config.split_policy {
            SplitPolicy::RootOnly => {
                leaf_for_mut(&mut self.root, &key).insert(key, row_id);
                if self.root.key_count() >= order {
                    self.split_root();
                }
            }
            SplitPolicy::Recursive => {
                let split = insert_recursive(&mut self.root, key, row_id, order);
                if let Some((separator, right)) = split {
                    self.grow_root(separator, right);
                }
            }
        }
    }

    /// Searches for `key`, recording every node visited.
    ///
    /// The trace starts with one root step, has one internal step per
    /// internal node on the path (the root included when it is internal),
    /// and ends with the leaf step followed by a found or not-found step.
    pub fn search(&self, key: &str) -> SearchOutcome {
        let mut trace = SearchTrace::new();
        let mut current = &self.root;

        trace.push(
            StepKind::Root,
            "Accessing the B+ tree root",
            Some(format!("Root keys: {}", format_keys(current.keys()))),
        );

        let leaf = loop {
            match current {
                Node::Leaf(leaf) => break leaf,
                Node::Internal(internal) => {
                    let i = internal.child_index(key);
                    trace.push(
                        StepKind::Internal,
                        format!("Internal node: searching for '{key}'"),
                        Some(format!(
                            "Following pointer {i} (range: {})",
                            internal.branch_range(i)
                        )),
                    );
                    current = &internal.children[i];
                }
            }
        };

        trace.push(
            StepKind::Leaf,
            "Leaf reached: looking for an exact match",
            Some(format!("Leaf keys: {}", format_keys(&leaf.keys))),
        );

        match leaf.get(key) {
            Some(ids) => {
                let listed: Vec<String> = ids.iter().map(ToString::to_string).collect();
                trace.push(
                    StepKind::Leaf,
                    format!("Match found for '{key}'"),
                    Some(format!("Row IDs retrieved: [{}]", listed.join(", "))),
                );
                SearchOutcome {
                    row_ids: ids.to_vec(),
                    trace,
                }
            }
            None => {
                trace.push(StepKind::Leaf, format!("No match found for '{key}'"), None);
                SearchOutcome {
                    row_ids: Vec::new(),
                    trace,
                }
            }
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Returns tree statistics.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            height: self.height(),
            ..TreeStats::default()
        };
        collect_stats(&self.root, &mut stats);
        stats
    }

    /// Verifies the structural invariants of the tree.
    ///
    /// Checks that keys are strictly increasing in every node, that leaves
    /// carry one non-empty row-ID list per key, that internal nodes have one
    /// more child than keys, that every key lies inside the range its parent
    /// assigns to it, and that all leaves sit at the same depth.
    pub fn check_invariants(&self) -> IndexResult<()> {
        let mut leaf_depth = None;
        check_node(&self.root, None, None, 1, &mut leaf_depth)
    }

    // =========================================================================
    // Internal Tree Operations
    // =========================================================================

    /// Splits the current root and puts a new internal root above the halves.
    fn split_root(&mut self) {
        let (separator, right) = match &mut self.root {
            Node::Leaf(leaf) => {
                let (separator, right) = leaf.split();
                (separator, Node::Leaf(right))
            }
            Node::Internal(internal) => {
                let (separator, right) = internal.split();
                (separator, Node::Internal(right))
            }
        };
        trace!(separator = %separator, "splitting index root");
        self.grow_root(separator, right);
    }

    /// Makes the current root the left child of a new one-key root.
    fn grow_root(&mut self, separator: String, right: Node) {
        let left = std::mem::take(&mut self.root);
        self.root = Node::Internal(InternalNode::from_split(left, separator, right));
    }
}

impl Default for BPlusTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Descends to the leaf that covers `key`.
fn leaf_for<'a>(node: &'a Node, key: &str) -> &'a LeafNode {
    match node {
        Node::Leaf(leaf) => leaf,
        Node::Internal(internal) => leaf_for(&internal.children[internal.child_index(key)], key),
    }
}

/// Descends to the leaf that covers `key`, mutably.
fn leaf_for_mut<'a>(node: &'a mut Node, key: &str) -> &'a mut LeafNode {
    match node {
        Node::Leaf(leaf) => leaf,
        Node::Internal(internal) => {
            let idx = internal.child_index(key);
            leaf_for_mut(&mut internal.children[idx], key)
        }
    }
}

/// Inserts below `node`, splitting every node that reaches `order` keys.
///
/// Returns the separator and new right sibling when `node` itself split.
fn insert_recursive(
    node: &mut Node,
    key: String,
    row_id: RowId,
    order: usize,
) -> Option<(String, Node)> {
    match node {
        Node::Leaf(leaf) => {
            leaf.insert(key, row_id);
            if leaf.len() < order {
                return None;
            }
            let (separator, right) = leaf.split();
            Some((separator, Node::Leaf(right)))
        }
        Node::Internal(internal) => {
            let idx = internal.child_index(&key);
            let child = &mut internal.children[idx];
            let (separator, right) = insert_recursive(child, key, row_id, order)?;
            internal.insert_split(idx, separator, right);
            if internal.keys.len() < order {
                return None;
            }
            let (separator, right) = internal.split();
            Some((separator, Node::Internal(right)))
        }
    }
}

fn collect_keys<'a>(node: &'a Node, out: &mut Vec<&'a str>) {
    match node {
        Node::Leaf(leaf) => out.extend(leaf.keys.iter().map(String::as_str)),
        Node::Internal(internal) => {
            for child in &internal.children {
                collect_keys(child, out);
            }
        }
    }
}

fn collect_stats(node: &Node, stats: &mut TreeStats) {
    match node {
        Node::Leaf(leaf) => {
            stats.leaf_count += 1;
            stats.key_count += leaf.len();
            stats.entry_count += leaf.entry_count();
            stats.max_leaf_keys = stats.max_leaf_keys.max(leaf.len());
        }
        Node::Internal(internal) => {
            stats.internal_count += 1;
            for child in &internal.children {
                collect_stats(child, stats);
            }
        }
    }
}

fn check_node(
    node: &Node,
    lower: Option<&str>,
    upper: Option<&str>,
    depth: usize,
    leaf_depth: &mut Option<usize>,
) -> IndexResult<()> {
    let keys = node.keys();

    if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(IndexError::structure_error(format!(
            "keys not strictly increasing: {}",
            format_keys(keys)
        )));
    }

    for key in keys {
        let below = lower.is_some_and(|lo| key.as_str() < lo);
        let above = upper.is_some_and(|hi| key.as_str() >= hi);
        if below || above {
            return Err(IndexError::structure_error(format!(
                "key '{key}' outside its range [{}, {})",
                lower.unwrap_or("-inf"),
                upper.unwrap_or("+inf")
            )));
        }
    }

    match node {
        Node::Leaf(leaf) => {
            if leaf.values.len() != leaf.keys.len() {
                return Err(IndexError::structure_error(format!(
                    "leaf has {} keys but {} value lists",
                    leaf.keys.len(),
                    leaf.values.len()
                )));
            }
            if leaf.values.iter().any(Vec::is_empty) {
                return Err(IndexError::structure_error("leaf holds an empty value list"));
            }
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(IndexError::structure_error(format!(
                        "leaf at depth {depth}, expected {expected}"
                    )));
                }
                Some(_) => {}
            }
            Ok(())
        }
        Node::Internal(internal) => {
            if internal.children.len() != internal.keys.len() + 1 {
                return Err(IndexError::structure_error(format!(
                    "internal node has {} keys but {} children",
                    internal.keys.len(),
                    internal.children.len()
                )));
            }
            for (i, child) in internal.children.iter().enumerate() {
                let child_lower = if i == 0 {
                    lower
                } else {
                    Some(internal.keys[i - 1].as_str())
                };
                let child_upper = internal.keys.get(i).map(String::as_str).or(upper);
                check_node(child, child_lower, child_upper, depth + 1, leaf_depth)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> RowId {
        RowId::new(n)
    }

    fn tree_with(keys: &[&str]) -> BPlusTree {
        let mut tree = BPlusTree::new();
        for (i, key) in keys.iter().enumerate() {
            tree.insert(*key, id(i as u64 + 1));
        }
        tree
    }

    #[test]
    fn test_empty_tree() {
        let tree = BPlusTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.order(), 4);
        assert!(tree.get("Beagle").is_none());
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_with_config_rejects_small_order() {
        let result = BPlusTree::with_config(IndexConfig::new().with_order(2));
        assert!(matches!(result, Err(IndexError::InvalidOrder { .. })));
    }

    #[test]
    fn test_insert_and_get() {
        let tree = tree_with(&["Labrador", "Beagle", "Bulldog"]);

        assert_eq!(tree.get("Labrador"), Some(&[id(1)][..]));
        assert_eq!(tree.get("Beagle"), Some(&[id(2)][..]));
        assert_eq!(tree.get("Bulldog"), Some(&[id(3)][..]));
        assert!(tree.get("Poodle").is_none());
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn test_duplicate_key_appends_row_id() {
        let mut tree = BPlusTree::new();
        tree.insert("Labrador", id(101));
        tree.insert("Labrador", id(104));

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get("Labrador"), Some(&[id(101), id(104)][..]));
    }

    #[test]
    fn test_root_split_at_order() {
        let tree = tree_with(&["a", "b", "c", "d"]);

        assert_eq!(tree.height(), 2);
        let Node::Internal(root) = tree.root() else {
            panic!("root should be internal after reaching the order");
        };
        assert_eq!(root.keys, vec!["c"]);
        assert_eq!(root.children[0].keys(), ["a", "b"]);
        assert_eq!(root.children[1].keys(), ["c", "d"]);
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_root_only_policy_never_splits_leaves() {
        let keys: Vec<String> = (0..50).map(|i| format!("breed{:02}", i)).collect();
        let mut tree = BPlusTree::new();
        for (i, key) in keys.iter().enumerate() {
            tree.insert(key.as_str(), id(i as u64));
        }

        let stats = tree.stats();
        assert_eq!(stats.height, 2);
        assert_eq!(stats.internal_count, 1);
        assert_eq!(stats.leaf_count, 2);
        assert_eq!(stats.key_count, 50);
        assert!(stats.max_leaf_keys > tree.order());

        for (i, key) in keys.iter().enumerate() {
            assert_eq!(tree.get(key), Some(&[id(i as u64)][..]), "missing {key}");
        }
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_recursive_policy_keeps_nodes_below_order() {
        let config = IndexConfig::new().with_split_policy(SplitPolicy::Recursive);
        let mut tree = BPlusTree::with_config(config).unwrap();
        for i in 0..200u64 {
            tree.insert(format!("breed{:03}", (i * 37) % 200), id(i));
        }

        let stats = tree.stats();
        assert_eq!(stats.key_count, 200);
        assert!(stats.max_leaf_keys < tree.order());
        assert!(stats.height > 2);
        assert!(tree.check_invariants().is_ok());

        for i in 0..200u64 {
            let key = format!("breed{:03}", (i * 37) % 200);
            assert_eq!(tree.get(&key), Some(&[id(i)][..]));
        }
    }

    #[test]
    fn test_keys_in_order() {
        let tree = tree_with(&["Poodle", "Beagle", "Labrador", "Akita", "Boxer", "Pug"]);
        assert_eq!(
            tree.keys(),
            vec!["Akita", "Beagle", "Boxer", "Labrador", "Poodle", "Pug"]
        );
    }

    #[test]
    fn test_search_single_leaf_trace() {
        let tree = tree_with(&["Labrador", "Beagle"]);
        let outcome = tree.search("Beagle");

        assert_eq!(outcome.row_ids, vec![id(2)]);
        let kinds: Vec<StepKind> = outcome.trace.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![StepKind::Root, StepKind::Leaf, StepKind::Leaf]);
        assert_eq!(
            outcome.trace.steps()[0].detail.as_deref(),
            Some("Root keys: [Beagle, Labrador]")
        );
        assert_eq!(
            outcome.trace.steps()[2].detail.as_deref(),
            Some("Row IDs retrieved: [2]")
        );
    }

    #[test]
    fn test_search_through_internal_root() {
        let tree = tree_with(&["a", "b", "c", "d"]);
        let outcome = tree.search("b");

        assert_eq!(outcome.row_ids, vec![id(2)]);
        let kinds: Vec<StepKind> = outcome.trace.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![StepKind::Root, StepKind::Internal, StepKind::Leaf, StepKind::Leaf]
        );
        assert_eq!(
            outcome.trace.steps()[1].detail.as_deref(),
            Some("Following pointer 0 (range: < c)")
        );
    }

    #[test]
    fn test_search_missing_key() {
        let tree = tree_with(&["a", "b", "c", "d"]);
        let outcome = tree.search("zebra");

        assert!(outcome.row_ids.is_empty());
        let last = outcome.trace.steps().last().unwrap();
        assert_eq!(last.kind, StepKind::Leaf);
        assert!(last.message.contains("No match"));
        assert!(last.detail.is_none());
    }

    #[test]
    fn test_search_empty_tree() {
        let tree = BPlusTree::new();
        let outcome = tree.search("Beagle");

        assert!(outcome.row_ids.is_empty());
        assert_eq!(outcome.trace.count(StepKind::Root), 1);
        assert_eq!(outcome.trace.count(StepKind::Internal), 0);
    }

    #[test]
    fn test_internal_step_count_matches_height() {
        let config = IndexConfig::new()
            .with_order(3)
            .with_split_policy(SplitPolicy::Recursive);
        let mut tree = BPlusTree::with_config(config).unwrap();
        for i in 0..64u64 {
            tree.insert(format!("k{:02}", i), id(i));
        }

        let outcome = tree.search("k17");
        assert_eq!(outcome.row_ids, vec![id(17)]);
        assert_eq!(outcome.trace.count(StepKind::Internal), tree.height() - 1);
    }

    #[test]
    fn test_search_does_not_mutate() {
        let tree = tree_with(&["a", "b", "c", "d", "e"]);
        let before = tree.clone();
        let _ = tree.search("c");
        let _ = tree.search("missing");
        assert_eq!(tree, before);
    }

    #[test]
    fn test_check_invariants_detects_bad_ordering() {
        let mut tree = BPlusTree::new();
        tree.root = Node::Leaf(LeafNode {
            keys: vec!["b".to_string(), "a".to_string()],
            values: vec![vec![id(1)], vec![id(2)]],
        });
        assert!(matches!(
            tree.check_invariants(),
            Err(IndexError::TreeStructureError(_))
        ));
    }

    #[test]
    fn test_tree_serializes_root_and_order() {
        let tree = tree_with(&["a", "b", "c", "d"]);
        let json = serde_json::to_value(&tree).unwrap();

        assert_eq!(json["order"], 4);
        assert_eq!(json["split_policy"], "root-only");
        assert_eq!(json["root"]["kind"], "internal");
        assert_eq!(json["root"]["children"][1]["keys"][0], "c");
    }
}
