//! Tree Renderer
//!
//! Walks the tree and produces the rows a view would show. A node's children are only
//! emitted while its id is in the expansion set, so a collapsed subtree produces no rows
//! at all rather than hidden ones.

pub mod format;

use crate::controller::NodeState;
use crate::tree::{self, ExpansionSet, Node, NodeKind};
use crate::types::NodeId;
use serde::Serialize;
use std::sync::Arc;

pub use format::{format_rows, format_status_table};

/// Trailing indicator of a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "marker", rename_all = "snake_case")]
pub enum RowMarker {
    None,
    Spinner,
    Chevron { open: bool },
    Error { reason: String },
}

/// One visible line of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    pub size: Option<String>,
    pub level: usize,
    pub marker: RowMarker,
}

fn marker_for(node: &Node, expanded: &ExpansionSet) -> RowMarker {
    if node.is_loading {
        RowMarker::Spinner
    } else if let Some(reason) = &node.error {
        RowMarker::Error {
            reason: reason.clone(),
        }
    } else if node.is_expandable() && !node.is_empty {
        RowMarker::Chevron {
            open: expanded.contains(&node.id),
        }
    } else {
        RowMarker::None
    }
}

/// Visible rows in display order
pub fn render_rows(roots: &[Arc<Node>], expanded: &ExpansionSet) -> Vec<Row> {
    let mut rows = Vec::new();
    push_rows(roots, 0, expanded, &mut rows);
    rows
}

fn push_rows(nodes: &[Arc<Node>], level: usize, expanded: &ExpansionSet, rows: &mut Vec<Row>) {
    for node in nodes {
        rows.push(Row {
            id: node.id.clone(),
            label: node.label.clone(),
            kind: node.kind,
            size: node.size.clone(),
            level,
            marker: marker_for(node, expanded),
        });
        if expanded.contains(&node.id) {
            push_rows(node.children(), level + 1, expanded, rows);
        }
    }
}

/// State of one node, visible or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeStatusEntry {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    pub level: usize,
    pub state: NodeState,
    pub children: usize,
    pub error: Option<String>,
}

/// Every node of the tree with its state, depth-first
pub fn status_entries(roots: &[Arc<Node>], expanded: &ExpansionSet) -> Vec<NodeStatusEntry> {
    let mut entries = Vec::new();
    tree::visit(roots, 0, &mut |node, level| {
        entries.push(NodeStatusEntry {
            id: node.id.clone(),
            label: node.label.clone(),
            kind: node.kind,
            level,
            state: NodeState::of(node, expanded),
            children: node.children().len(),
            error: node.error.clone(),
        });
    });
    entries
}
