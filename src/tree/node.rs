//! Tree node types and their persisted representation

use crate::types::{NodeId, ROOT_ID};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Node kind, serialized under the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Png,
    Jpg,
    Doc,
    Directory,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Png,
        NodeKind::Jpg,
        NodeKind::Doc,
        NodeKind::Directory,
    ];

    pub fn is_directory(self) -> bool {
        matches!(self, NodeKind::Directory)
    }

    /// File extension for file kinds; `None` for directories
    pub fn extension(self) -> Option<&'static str> {
        match self {
            NodeKind::Png => Some("png"),
            NodeKind::Jpg => Some("jpg"),
            NodeKind::Doc => Some("doc"),
            NodeKind::Directory => None,
        }
    }
}

/// One entry of the tree.
///
/// `children` is only ever present on directories. `Some(vec![])` means a directory that is
/// collapsed or not yet loaded; `None` means the node cannot be expanded. Children are shared
/// behind `Arc` so an update only rebuilds the ancestor chain of the node it touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Arc<Node>>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_loading: bool,
    /// Reason of the last failed fetch; set means the node is in the failed state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Last fetch for this directory returned nothing
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_empty: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Node {
    /// Directory node with an empty (unloaded) children sequence
    pub fn directory(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: NodeKind::Directory,
            size: None,
            children: Some(Vec::new()),
            is_loading: false,
            error: None,
            is_empty: false,
        }
    }

    /// Non-expandable file node
    pub fn file(
        id: impl Into<NodeId>,
        label: impl Into<String>,
        kind: NodeKind,
        size: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            size,
            children: None,
            is_loading: false,
            error: None,
            is_empty: false,
        }
    }

    /// The synthetic root seeded on first start
    pub fn root() -> Self {
        Self::directory(ROOT_ID, "Root")
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = Some(children.into_iter().map(Arc::new).collect());
        self
    }

    /// Has a children field, i.e. the node may be toggled
    pub fn is_expandable(&self) -> bool {
        self.children.is_some()
    }

    /// Children are currently loaded
    pub fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }

    pub fn children(&self) -> &[Arc<Node>] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}
