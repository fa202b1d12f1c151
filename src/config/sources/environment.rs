//! Environment overrides: LINEAGE_SETTINGS_<KEY>, `__` between nested keys.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment};

pub const ENV_PREFIX: &str = "LINEAGE_SETTINGS";

/// Settings read as comma-separated lists from the environment
pub const LIST_KEYS: &[&str] = &["default_ownership", "mgmt_classes"];

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let mut source = Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",");
    for key in LIST_KEYS {
        source = source.with_list_parse_key(key);
    }
    Ok(builder.add_source(source))
}
