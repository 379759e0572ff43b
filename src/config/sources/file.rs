//! File sources; format follows the extension (toml, yaml, json).

use crate::error::ApiError;
use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use std::path::Path;

/// Global file: used when present, silently skipped otherwise
pub fn add_optional(builder: ConfigBuilder<DefaultState>, path: &Path) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(path).required(false))
}

/// Explicit file: must exist
pub fn add_required(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ApiError> {
    if !path.exists() {
        return Err(ApiError::ConfigError(format!(
            "Config file not found: {}",
            path.display()
        )));
    }
    Ok(builder.add_source(File::from(path).required(true)))
}
