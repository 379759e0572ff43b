//! Tree walks: lookup, path-copy update and shape derivation.
//!
//! Updates never mutate a node in place. The node being changed and each of its ancestors
//! get a fresh `Arc`; every other subtree is shared with the previous tree.

use crate::tree::node::Node;
use crate::types::NodeId;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Ordered set of expanded node ids
pub type ExpansionSet = BTreeSet<NodeId>;

/// Find a node anywhere in the tree
pub fn find_node<'a>(nodes: &'a [Arc<Node>], id: &str) -> Option<&'a Arc<Node>> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(node.children(), id) {
            return Some(found);
        }
    }
    None
}

/// Child indices leading from the roots to the node with `id`
pub fn path_to(nodes: &[Arc<Node>], id: &str) -> Option<Vec<usize>> {
    for (index, node) in nodes.iter().enumerate() {
        if node.id == id {
            return Some(vec![index]);
        }
        if let Some(mut rest) = path_to(node.children(), id) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

/// Replace the node with `id` by `update(node)`, rebuilding its ancestor chain.
///
/// Returns `None` when no node has that id.
pub fn update_node<F>(nodes: &[Arc<Node>], id: &str, update: F) -> Option<Vec<Arc<Node>>>
where
    F: FnOnce(&Node) -> Node,
{
    let path = path_to(nodes, id)?;
    Some(rebuild(nodes, &path, update))
}

fn rebuild<F>(nodes: &[Arc<Node>], path: &[usize], update: F) -> Vec<Arc<Node>>
where
    F: FnOnce(&Node) -> Node,
{
    let mut rebuilt = nodes.to_vec();
    let Some((&index, rest)) = path.split_first() else {
        return rebuilt;
    };
    let current = &nodes[index];
    let replacement = if rest.is_empty() {
        update(current)
    } else {
        let mut parent = Node::clone(current);
        parent.children = Some(rebuild(current.children(), rest, update));
        parent
    };
    rebuilt[index] = Arc::new(replacement);
    rebuilt
}

/// Ids of every node whose children sequence is non-empty
pub fn derive_expanded(nodes: &[Arc<Node>]) -> ExpansionSet {
    let mut ids = ExpansionSet::new();
    collect_expanded(nodes, &mut ids);
    ids
}

fn collect_expanded(nodes: &[Arc<Node>], ids: &mut ExpansionSet) {
    for node in nodes {
        if node.has_children() {
            ids.insert(node.id.clone());
            collect_expanded(node.children(), ids);
        }
    }
}

/// Every id in the tree
pub fn collect_ids(nodes: &[Arc<Node>]) -> HashSet<NodeId> {
    let mut ids = HashSet::new();
    visit(nodes, 0, &mut |node, _| {
        ids.insert(node.id.clone());
    });
    ids
}

/// Depth-first pre-order visit with the depth of each node
pub fn visit<F>(nodes: &[Arc<Node>], level: usize, f: &mut F)
where
    F: FnMut(&Node, usize),
{
    for node in nodes {
        f(node, level);
        visit(node.children(), level + 1, f);
    }
}

/// Check the structural invariants a persisted tree must hold.
///
/// Ids are unique across the whole tree and only directories carry a children field.
pub fn validate(nodes: &[Arc<Node>]) -> Result<(), String> {
    if nodes.is_empty() {
        return Err("tree has no roots".to_string());
    }
    let mut seen = HashSet::new();
    let mut problem = None;
    visit(nodes, 0, &mut |node, _| {
        if problem.is_some() {
            return;
        }
        if !seen.insert(node.id.clone()) {
            problem = Some(format!("duplicate node id {:?}", node.id));
        } else if node.children.is_some() && !node.kind.is_directory() {
            problem = Some(format!("non-directory node {:?} has children", node.id));
        }
    });
    match problem {
        Some(problem) => Err(problem),
        None => Ok(()),
    }
}
