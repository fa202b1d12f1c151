//! Error types for the lineage item model.

use thiserror::Error;

/// Errors raised by item mutation, resolution, serialization and matching
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ItemError {
    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("{item} inherits property '{property}', but neither its parents nor the settings have it")]
    UnresolvedInheritance { item: String, property: String },

    #[error("{kind} \"{item}\" does not have property '{property}'")]
    UnknownAttribute {
        kind: String,
        item: String,
        property: String,
    },

    #[error("The following keys supplied could not be set: {0:?}")]
    UnknownFields(Vec<String>),

    #[error("Property '{property}' is derived and cannot be set")]
    ReadOnly { property: String },

    #[error("Property '{property}' is not {expected}")]
    WrongShape { property: String, expected: String },

    #[error("find cannot compare type: {0}")]
    TypeComparison(String),

    #[error("Inheritance cycle detected at item '{item}'")]
    Cycle { item: String },

    #[error("Malformed input: {0}")]
    Format(String),
}

impl ItemError {
    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        ItemError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn wrong_shape(property: &str, expected: &str) -> Self {
        ItemError::WrongShape {
            property: property.to_string(),
            expected: expected.to_string(),
        }
    }
}

/// Settings loading and logging setup errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Settings validation failed:\n{0}")]
    Invalid(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl From<config::ConfigError> for SettingsError {
    fn from(err: config::ConfigError) -> Self {
        SettingsError::ConfigError(err.to_string())
    }
}
