//! ConfigLoader facade delegating to the merge service.

use super::merge::service::MergeService;
use super::LazytreeConfig;
use crate::error::ApiError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, the global file, an optional explicit file and the environment.
    pub fn load(explicit: Option<&Path>) -> Result<LazytreeConfig, ApiError> {
        let global = super::xdg::global_config_path().ok();
        MergeService::load(global.as_deref(), explicit)
    }
}
