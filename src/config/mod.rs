//! Configuration
//!
//! Layered settings for storage, the mock provider and logging. Sources, lowest precedence
//! first: built-in defaults, the global file `$XDG_CONFIG_HOME/lazytree/config.toml`, an
//! explicit `--config` file, then `LAZYTREE__SECTION__KEY` environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod storage_paths;

use crate::logging::LoggingConfig;
use crate::provider::MockProviderConfig;
use serde::{Deserialize, Serialize};

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use storage_paths::StorageConfig;

/// Complete runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LazytreeConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub provider: MockProviderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
