//! Settings loading entry points.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::{LineageConfig, Settings};
use crate::error::SettingsError;
use crate::logging::LoggingConfig;
use crate::value::Mapping;
use config::{Config, ConfigError, File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

const LOGGING_TABLE: &str = "logging";

/// Loads [`LineageConfig`] from the layered settings sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, the global file, workspace files and environment overrides
    pub fn load(workspace_root: &Path) -> Result<LineageConfig, SettingsError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder)?;
        Self::finish(builder.build()?)
    }

    /// Load defaults plus a single settings file
    pub fn load_from_file(path: &Path) -> Result<LineageConfig, SettingsError> {
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Toml));
        Self::finish(builder.build()?)
    }

    /// Load defaults plus settings given as a TOML document
    pub fn load_from_toml_str(content: &str) -> Result<LineageConfig, SettingsError> {
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from_str(content, FileFormat::Toml));
        Self::finish(builder.build()?)
    }

    /// Path the global settings file is read from
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    fn finish(config: Config) -> Result<LineageConfig, SettingsError> {
        let logging = match config.get::<LoggingConfig>(LOGGING_TABLE) {
            Ok(logging) => logging,
            Err(ConfigError::NotFound(_)) => LoggingConfig::default(),
            Err(e) => return Err(e.into()),
        };
        let mut values: Mapping = config.try_deserialize()?;
        values.remove(LOGGING_TABLE);
        debug!(keys = values.len(), "Loaded settings");
        Ok(LineageConfig {
            settings: Settings::from(values),
            logging,
        })
    }
}
