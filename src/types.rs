//! Core types shared across the tree view.

/// NodeId: identifier of a tree node, unique across the whole tree
pub type NodeId = String;

/// Generation: per-node counter used to discard stale fetch results
pub type Generation = u64;

/// Storage key the tree snapshot lives under unless configured otherwise
pub const DEFAULT_STATE_KEY: &str = "fileSystemState";

/// Id of the synthetic root seeded when no usable snapshot exists
pub const ROOT_ID: &str = "root";
