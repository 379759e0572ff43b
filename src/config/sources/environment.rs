//! Environment variable source: LAZYTREE__ prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

/// Add environment variable overlay to builder.
/// `LAZYTREE__PROVIDER__DELAY_MS=0` sets `provider.delay_ms`.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("LAZYTREE")
            .separator("__")
            .try_parsing(true),
    )
}
