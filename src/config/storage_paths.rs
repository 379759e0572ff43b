//! StorageConfig: where the tree snapshot lives.

use crate::config::xdg;
use crate::error::ApiError;
use crate::types::DEFAULT_STATE_KEY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_key() -> String {
    DEFAULT_STATE_KEY.to_string()
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// sled database directory; None means the XDG data directory
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Key the snapshot is stored under
    #[serde(default = "default_key")]
    pub key: String,
}

impl StorageConfig {
    /// Resolve the database directory, preferring an explicit override.
    pub fn resolve_path(&self, cli_path: Option<PathBuf>) -> Result<PathBuf, ApiError> {
        if let Some(path) = cli_path {
            return Ok(path);
        }
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => xdg::default_store_path(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            key: default_key(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_path_wins() {
        let config = StorageConfig {
            path: Some(PathBuf::from("/tmp/configured")),
            key: default_key(),
        };
        let path = config.resolve_path(Some(PathBuf::from("/tmp/cli"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/cli"));
        let path = config.resolve_path(None).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/configured"));
    }

    #[test]
    fn test_default_path_is_under_lazytree() {
        let path = StorageConfig::default().resolve_path(None).unwrap();
        assert!(path.ends_with("lazytree/state"));
    }
}
