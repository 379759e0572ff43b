//! MergeService: stacks sources in precedence order and deserializes to LazytreeConfig.

use crate::config::sources::{environment, file};
use crate::config::LazytreeConfig;
use crate::error::ApiError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> global file -> explicit file -> environment (highest).
    pub fn load(global: Option<&Path>, explicit: Option<&Path>) -> Result<LazytreeConfig, ApiError> {
        let builder = builder_with_defaults()?;
        let builder = match global {
            Some(path) => file::add_optional(builder, path),
            None => builder,
        };
        let builder = match explicit {
            Some(path) => file::add_required(builder, path)?,
            None => builder,
        };
        let builder = environment::add_to_builder(builder);

        let config = builder.build()?;
        let loaded: LazytreeConfig = config.try_deserialize()?;
        Ok(loaded)
    }
}

/// Builder seeded with the serialized defaults so every key exists.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ApiError> {
    let defaults = Config::try_from(&LazytreeConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}
