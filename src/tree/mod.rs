//! Hierarchical tree model: nodes and the walks that read and rebuild them.

pub mod node;
pub mod walk;

pub use node::{Node, NodeKind};
pub use walk::{
    collect_ids, derive_expanded, find_node, path_to, update_node, validate, visit, ExpansionSet,
};
