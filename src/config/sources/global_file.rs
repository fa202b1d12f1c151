//! Global settings file: $XDG_CONFIG_HOME/lineage/settings.toml or ~/.config/lineage/settings.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::PathBuf;
use tracing::warn;

const APP_DIR: &str = "lineage";
const FILE_NAME: &str = "settings.toml";

/// Path to the global settings file.
pub fn global_config_path() -> Option<PathBuf> {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => PathBuf::from(std::env::var("HOME").ok()?).join(".config"),
    };
    Some(base.join(APP_DIR).join(FILE_NAME))
}

/// Add the global settings file to the builder if it exists.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(path) = global_config_path() {
        if path.exists() {
            let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
            builder = builder.add_source(
                File::from(canonical)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        } else {
            warn!(
                config_path = %path.display(),
                "Global settings file not found. Consider creating it for user-level defaults."
            );
        }
    }
    Ok(builder)
}
