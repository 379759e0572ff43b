//! Tree Controller
//!
//! Owns the store, the expansion set and the per-node generation counters, and drives the
//! `collapsed -> loading -> expanded | failed` state machine behind [`TreeController::toggle`].
//!
//! The expansion set is the source of truth for what is open. It is derived from the tree
//! shape once, when the controller is built from a rehydrated store, and after that only
//! transitions change it. Each transition keeps it equal to the ids whose children are
//! loaded.
//!
//! A toggle is split into a synchronous [`begin_toggle`](TreeController::begin_toggle) and
//! [`complete_fetch`](TreeController::complete_fetch). The state lock is never held across
//! the provider call.

pub mod state;

use crate::error::{ApiError, ProviderError};
use crate::provider::ChildProvider;
use crate::store::TreeStore;
use crate::tree::{self, ExpansionSet, Node};
use crate::types::{Generation, NodeId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use state::{FetchTicket, NodeState, ToggleOutcome, Transition};

struct ControllerState {
    store: TreeStore,
    expanded: ExpansionSet,
    generations: HashMap<NodeId, Generation>,
}

impl ControllerState {
    fn generation(&self, id: &str) -> Generation {
        self.generations.get(id).copied().unwrap_or(0)
    }

    fn bump(&mut self, id: &str) -> Generation {
        let generation = self.generations.entry(id.to_string()).or_insert(0);
        *generation += 1;
        *generation
    }

    /// Bump only ids that were ever issued a ticket
    fn bump_existing(&mut self, id: &str) {
        if let Some(generation) = self.generations.get_mut(id) {
            *generation += 1;
        }
    }

    /// Record a failure in memory when the store cannot take the new tree
    fn fail_in_memory(&mut self, id: &str, reason: &str) {
        let roots = tree::update_node(self.store.get(), id, |node| mark_failed(node, reason));
        if let Some(roots) = roots {
            self.store.stage(roots);
        }
        self.expanded.remove(id);
    }

    /// Replace the node with `id` and persist the new tree
    fn replace<F>(&mut self, id: &str, update: F) -> Result<(), ApiError>
    where
        F: FnOnce(&Node) -> Node,
    {
        let roots = tree::update_node(self.store.get(), id, update)
            .ok_or_else(|| ApiError::NodeNotFound(id.to_string()))?;
        self.store.set(roots)?;
        Ok(())
    }
}

fn mark_failed(node: &Node, reason: &str) -> Node {
    let mut node = node.clone();
    node.is_loading = false;
    node.error = Some(reason.to_string());
    node
}

/// Expand/collapse controller over a [`TreeStore`]
pub struct TreeController {
    state: Mutex<ControllerState>,
    provider: Arc<dyn ChildProvider>,
}

impl TreeController {
    pub fn new(store: TreeStore, provider: Arc<dyn ChildProvider>) -> Self {
        let expanded = tree::derive_expanded(store.get());
        debug!(expanded = expanded.len(), "Controller initialised from tree shape");
        Self {
            state: Mutex::new(ControllerState {
                store,
                expanded,
                generations: HashMap::new(),
            }),
            provider,
        }
    }

    /// Current roots
    pub fn roots(&self) -> Vec<Arc<Node>> {
        self.state.lock().store.get().to_vec()
    }

    pub fn expanded_ids(&self) -> ExpansionSet {
        self.state.lock().expanded.clone()
    }

    /// Roots and expansion set taken under one lock
    pub fn view(&self) -> (Vec<Arc<Node>>, ExpansionSet) {
        let state = self.state.lock();
        (state.store.get().to_vec(), state.expanded.clone())
    }

    pub fn node_state(&self, id: &str) -> Option<NodeState> {
        let state = self.state.lock();
        tree::find_node(state.store.get(), id).map(|node| NodeState::of(node, &state.expanded))
    }

    pub fn generation(&self, id: &str) -> Generation {
        self.state.lock().generation(id)
    }

    /// Serialized form of the current tree, as persisted
    pub fn snapshot(&self) -> Result<String, ApiError> {
        Ok(self.state.lock().store.snapshot()?)
    }

    /// Toggle a node: collapse it, cancel its pending fetch, or expand it via the provider
    pub async fn toggle(&self, id: &str) -> Result<ToggleOutcome, ApiError> {
        let transition = self.begin_toggle(id)?;
        self.finish(transition).await
    }

    /// Re-run the fetch of a node in the failed state; no-op for any other state
    pub async fn retry(&self, id: &str) -> Result<ToggleOutcome, ApiError> {
        let transition = self.begin_retry(id)?;
        self.finish(transition).await
    }

    async fn finish(&self, transition: Transition) -> Result<ToggleOutcome, ApiError> {
        match transition {
            Transition::NoOp => Ok(ToggleOutcome::NoOp),
            Transition::Collapsed => Ok(ToggleOutcome::Collapsed),
            Transition::Cancelled => Ok(ToggleOutcome::Cancelled),
            Transition::Fetch(ticket) => {
                let result = self.provider.fetch_children(&ticket.node_id).await;
                self.complete_fetch(ticket, result)
            }
        }
    }

    /// Apply the synchronous part of a toggle
    pub fn begin_toggle(&self, id: &str) -> Result<Transition, ApiError> {
        let mut state = self.state.lock();
        let node = match tree::find_node(state.store.get(), id) {
            Some(node) => Arc::clone(node),
            None => {
                debug!(node_id = id, "Toggle on unknown node ignored");
                return Ok(Transition::NoOp);
            }
        };

        match NodeState::of(&node, &state.expanded) {
            NodeState::Leaf => Ok(Transition::NoOp),
            NodeState::Loading => Self::cancel(&mut state, id),
            NodeState::Expanded => Self::collapse(&mut state, &node),
            NodeState::Collapsed | NodeState::Failed => Self::start_fetch(&mut state, id),
        }
    }

    /// Apply the synchronous part of a retry
    pub fn begin_retry(&self, id: &str) -> Result<Transition, ApiError> {
        let mut state = self.state.lock();
        let failed = tree::find_node(state.store.get(), id)
            .map(|node| NodeState::of(node, &state.expanded) == NodeState::Failed)
            .unwrap_or(false);
        if !failed {
            debug!(node_id = id, "Retry on node that has not failed ignored");
            return Ok(Transition::NoOp);
        }
        Self::start_fetch(&mut state, id)
    }

    fn start_fetch(state: &mut ControllerState, id: &str) -> Result<Transition, ApiError> {
        state.replace(id, |node| {
            let mut node = node.clone();
            node.is_loading = true;
            node.error = None;
            node.is_empty = false;
            node
        })?;
        let generation = state.bump(id);
        debug!(node_id = id, generation, "Node loading");
        Ok(Transition::Fetch(FetchTicket {
            node_id: id.to_string(),
            generation,
        }))
    }

    fn cancel(state: &mut ControllerState, id: &str) -> Result<Transition, ApiError> {
        state.replace(id, |node| {
            let mut node = node.clone();
            node.is_loading = false;
            node
        })?;
        let generation = state.bump(id);
        state.expanded.remove(id);
        debug!(node_id = id, generation, "Pending fetch cancelled");
        Ok(Transition::Cancelled)
    }

    fn collapse(state: &mut ControllerState, node: &Node) -> Result<Transition, ApiError> {
        state.replace(&node.id, |node| {
            let mut node = node.clone();
            node.children = Some(Vec::new());
            node.is_empty = false;
            node.error = None;
            node
        })?;
        // Descendants leave the tree; their in-flight fetches must not land on a
        // later node that reuses the same id.
        let mut dropped = tree::collect_ids(node.children());
        dropped.insert(node.id.clone());
        for id in &dropped {
            state.bump_existing(id);
            state.expanded.remove(id);
        }
        debug!(node_id = %node.id, dropped = dropped.len() - 1, "Node collapsed");
        Ok(Transition::Collapsed)
    }

    /// Apply a provider result, unless its ticket has been superseded
    pub fn complete_fetch(
        &self,
        ticket: FetchTicket,
        result: Result<Vec<Node>, ProviderError>,
    ) -> Result<ToggleOutcome, ApiError> {
        let mut state = self.state.lock();
        let id = ticket.node_id.as_str();

        let current = state.generation(id);
        if current != ticket.generation {
            debug!(
                node_id = id,
                ticket = ticket.generation,
                current,
                "Discarding stale fetch result"
            );
            return Ok(ToggleOutcome::Discarded);
        }
        let loading = tree::find_node(state.store.get(), id)
            .map(|node| node.is_loading)
            .unwrap_or(false);
        if !loading {
            debug!(node_id = id, "Discarding fetch result for node no longer loading");
            return Ok(ToggleOutcome::Discarded);
        }

        let children = match result {
            Ok(children) => children,
            Err(e) => {
                warn!(node_id = id, "Fetch failed: {}", e);
                return Self::fail(&mut state, id, e.reason().to_string());
            }
        };

        let children: Vec<Arc<Node>> = children.into_iter().map(Arc::new).collect();
        let count = children.len();
        let nested = tree::derive_expanded(&children);
        let candidate = tree::update_node(state.store.get(), id, |node| {
            let mut node = node.clone();
            node.children = Some(children);
            node.is_loading = false;
            node.is_empty = count == 0;
            node
        })
        .ok_or_else(|| ApiError::NodeNotFound(id.to_string()))?;

        if let Err(problem) = tree::validate(&candidate) {
            warn!(node_id = id, "Rejecting fetched children: {}", problem);
            return Self::fail(&mut state, id, problem);
        }

        if let Err(e) = state.store.set(candidate) {
            warn!(node_id = id, "Failed to persist fetched children: {}", e);
            state.fail_in_memory(id, &e.to_string());
            return Err(e.into());
        }
        if count == 0 {
            state.expanded.remove(id);
            info!(node_id = id, "Directory is empty");
            return Ok(ToggleOutcome::Empty);
        }
        state.expanded.insert(id.to_string());
        state.expanded.extend(nested);
        info!(node_id = id, children = count, "Node expanded");
        Ok(ToggleOutcome::Expanded { children: count })
    }

    fn fail(
        state: &mut ControllerState,
        id: &str,
        reason: String,
    ) -> Result<ToggleOutcome, ApiError> {
        if let Err(e) = state.replace(id, |node| mark_failed(node, &reason)) {
            state.fail_in_memory(id, &reason);
            return Err(e);
        }
        state.expanded.remove(id);
        Ok(ToggleOutcome::Failed { reason })
    }

    /// Replace the tree with the default root
    pub fn reset(&self) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        state.store.reset()?;
        for generation in state.generations.values_mut() {
            *generation += 1;
        }
        state.expanded.clear();
        info!("Tree reset to default root");
        Ok(())
    }
}
