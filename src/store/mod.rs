//! Tree State Store
//!
//! Holds the current roots and writes a snapshot through a [`StateRepository`] on every
//! change. On open, a missing, unparsable or structurally invalid snapshot is replaced by a
//! single collapsed root.

pub mod persistence;

use crate::error::StorageError;
use crate::tree::{self, Node};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

pub use persistence::SledStateRepository;

/// Durable slot holding the serialized tree
pub trait StateRepository: Send + Sync {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&self, snapshot: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// In-memory repository, mostly for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStateRepository {
    slot: Mutex<Option<String>>,
    writes: Mutex<usize>,
}

impl MemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(snapshot.into())),
            writes: Mutex::new(0),
        }
    }

    pub fn snapshot(&self) -> Option<String> {
        self.slot.lock().clone()
    }

    /// Number of saves since construction
    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }
}

impl StateRepository for MemoryStateRepository {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, snapshot: &str) -> Result<(), StorageError> {
        *self.slot.lock() = Some(snapshot.to_string());
        *self.writes.lock() += 1;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot.lock() = None;
        Ok(())
    }
}

/// Serialize roots to the storage schema (JSON array of nodes)
pub fn encode_roots(roots: &[Arc<Node>]) -> Result<String, StorageError> {
    Ok(serde_json::to_string(roots)?)
}

/// Parse and validate a stored snapshot
pub fn decode_roots(snapshot: &str) -> Result<Vec<Arc<Node>>, StorageError> {
    let roots: Vec<Arc<Node>> = serde_json::from_str(snapshot)?;
    tree::validate(&roots).map_err(StorageError::InvalidSnapshot)?;
    Ok(roots)
}

/// The tree a fresh store starts from
pub fn default_roots() -> Vec<Arc<Node>> {
    vec![Arc::new(Node::root())]
}

/// No fetch survives a restart, so loading flags in a snapshot are stale.
fn settle_loading(nodes: &[Arc<Node>]) -> Vec<Arc<Node>> {
    nodes
        .iter()
        .map(|node| {
            let mut node = Node::clone(node);
            node.is_loading = false;
            if let Some(children) = node.children.take() {
                node.children = Some(settle_loading(&children));
            }
            Arc::new(node)
        })
        .collect()
}

/// Current tree snapshot plus its persistence
pub struct TreeStore {
    repository: Arc<dyn StateRepository>,
    roots: Vec<Arc<Node>>,
}

impl TreeStore {
    /// Rehydrate from the repository, falling back to the default root
    pub fn open(repository: Arc<dyn StateRepository>) -> Self {
        let roots = match repository.load() {
            Ok(Some(snapshot)) => match decode_roots(&snapshot) {
                Ok(roots) => {
                    debug!(roots = roots.len(), "Rehydrated tree snapshot");
                    settle_loading(&roots)
                }
                Err(e) => {
                    warn!("Discarding persisted tree snapshot: {}", e);
                    default_roots()
                }
            },
            Ok(None) => {
                debug!("No persisted tree snapshot, seeding root");
                default_roots()
            }
            Err(e) => {
                warn!("Failed to read persisted tree snapshot: {}", e);
                default_roots()
            }
        };
        Self { repository, roots }
    }

    pub fn get(&self) -> &[Arc<Node>] {
        &self.roots
    }

    /// Persist the roots, then make them current. A failed save leaves the store unchanged.
    pub fn set(&mut self, roots: Vec<Arc<Node>>) -> Result<(), StorageError> {
        let snapshot = encode_roots(&roots)?;
        self.repository.save(&snapshot)?;
        self.roots = roots;
        Ok(())
    }

    /// Replace the roots in memory only; the next successful `set` writes them out
    pub(crate) fn stage(&mut self, roots: Vec<Arc<Node>>) {
        self.roots = roots;
    }

    /// Back to a single collapsed root
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.set(default_roots())
    }

    pub fn snapshot(&self) -> Result<String, StorageError> {
        encode_roots(&self.roots)
    }
}
