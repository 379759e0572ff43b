//! Lazytree: lazy-loading hierarchical tree view core
//!
//! A tree of directories and files whose children are fetched on demand from an injected
//! provider, with expand/collapse state persisted across runs.

pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod provider;
pub mod render;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
