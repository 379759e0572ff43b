//! Per-node states and the values exchanged by a toggle.

use crate::tree::{ExpansionSet, Node};
use crate::types::{Generation, NodeId};
use serde::Serialize;

/// Display state of one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// No children field; toggling does nothing
    Leaf,
    Collapsed,
    Loading,
    Expanded,
    Failed,
}

impl NodeState {
    pub fn of(node: &Node, expanded: &ExpansionSet) -> Self {
        if !node.is_expandable() {
            NodeState::Leaf
        } else if node.is_loading {
            NodeState::Loading
        } else if node.is_failed() {
            NodeState::Failed
        } else if expanded.contains(&node.id) {
            NodeState::Expanded
        } else {
            NodeState::Collapsed
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeState::Leaf => "leaf",
            NodeState::Collapsed => "collapsed",
            NodeState::Loading => "loading",
            NodeState::Expanded => "expanded",
            NodeState::Failed => "failed",
        }
    }
}

/// Handle for an issued fetch; its result only applies while the generation still matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub node_id: NodeId,
    pub generation: Generation,
}

/// Synchronous half of a toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Unknown id, leaf, or (for retry) a node that is not failed
    NoOp,
    /// Expanded node emptied and hidden
    Collapsed,
    /// Loading node returned to collapsed; its fetch will be discarded
    Cancelled,
    /// Node is now loading; run the fetch and hand the result to `complete_fetch`
    Fetch(FetchTicket),
}

/// Final result of a toggle or retry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ToggleOutcome {
    NoOp,
    Collapsed,
    Cancelled,
    Expanded { children: usize },
    /// Fetch returned nothing; the directory stays collapsed and loses its chevron
    Empty,
    Failed { reason: String },
    /// Result arrived for a superseded generation and was dropped
    Discarded,
}
