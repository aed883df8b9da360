//! Search traces.
//!
//! A trace records the path a search took through the tree, one step per
//! visited node plus a final outcome step. It is purely observational: the
//! search result never depends on it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of node a trace step describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// The root, whatever its variant.
    Root,
    /// An internal node on the way down.
    Internal,
    /// The leaf the search ended in.
    Leaf,
}

impl StepKind {
    /// Returns the lowercase tag for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Root => "root",
            StepKind::Internal => "internal",
            StepKind::Leaf => "leaf",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a search trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    /// Node kind this step describes.
    pub kind: StepKind,
    /// Short description of the step.
    pub message: String,
    /// Optional detail, such as the node's keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Ordered, append-only list of trace steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchTrace {
    steps: Vec<TraceStep>,
}

impl SearchTrace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step.
    pub fn push(&mut self, kind: StepKind, message: impl Into<String>, detail: Option<String>) {
        self.steps.push(TraceStep {
            kind,
            message: message.into(),
            detail,
        });
    }

    /// Returns the recorded steps.
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    /// Returns the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if no step was recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Counts the steps of one kind.
    pub fn count(&self, kind: StepKind) -> usize {
        self.steps.iter().filter(|s| s.kind == kind).count()
    }

    /// Iterates over the steps.
    pub fn iter(&self) -> std::slice::Iter<'_, TraceStep> {
        self.steps.iter()
    }
}

impl IntoIterator for SearchTrace {
    type Item = TraceStep;
    type IntoIter = std::vec::IntoIter<TraceStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

impl<'a> IntoIterator for &'a SearchTrace {
    type Item = &'a TraceStep;
    type IntoIter = std::slice::Iter<'a, TraceStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Formats keys the way trace details show them: `[a, b, c]`.
pub(crate) fn format_keys(keys: &[String]) -> String {
    format!("[{}]", keys.join(", "))
}
