//! Configuration System
//!
//! The settings object is the terminus of every resolution chain. It is loaded
//! once from layered sources (built-in defaults, the global settings file,
//! workspace files, environment variables), then shared read-only with every
//! item through an `Arc`.

use crate::inherit::INHERIT_TOKEN;
use crate::item::enums::member_for;
use crate::item::ItemKind;
use crate::logging::LoggingConfig;
use crate::value::{Mapping, Value};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use merge::merge_policy::builtin_defaults;

/// Global settings consulted at the end of every resolution chain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(Mapping);

impl Settings {
    /// Empty settings: every inherited property is unresolvable
    pub fn new() -> Self {
        Self(Mapping::new())
    }

    /// The built-in defaults, with a terminus for every resolvable property
    pub fn defaults() -> Self {
        Self(builtin_defaults())
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// `key`, or failing that `default_<key>`
    pub fn terminus(&self, key: &str) -> Option<&Value> {
        self.0
            .get(key)
            .or_else(|| self.0.get(&format!("default_{}", key)))
    }

    pub fn into_shared(self) -> Arc<Settings> {
        Arc::new(self)
    }
}

impl Deref for Settings {
    type Target = Mapping;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Mapping> for Settings {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

/// Everything read from the settings sources
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineageConfig {
    pub settings: Settings,
    pub logging: LoggingConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A resolvable property has nothing to fall back to
    MissingTerminus {
        kind: ItemKind,
        property: String,
        key: String,
    },
    /// The fallback exists but cannot be used for the property
    InvalidTerminus {
        kind: ItemKind,
        property: String,
        key: String,
        reason: String,
    },
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingTerminus {
                kind,
                property,
                key,
            } => write!(
                f,
                "{} property '{}': no settings value for '{}' or 'default_{}'",
                kind, property, key, key
            ),
            ValidationError::InvalidTerminus {
                kind,
                property,
                key,
                reason,
            } => write!(f, "{} property '{}': setting '{}' {}", kind, property, key, reason),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl LineageConfig {
    /// Check every resolvable property of every kind has a usable terminus
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for kind in ItemKind::ALL {
            for spec in kind.schema().fields() {
                let Some(shape) = spec.shape() else {
                    continue;
                };
                if !shape.is_resolvable() {
                    continue;
                }
                let key = spec.settings_key.unwrap_or(spec.resolution_name());
                let invalid = |reason: String| ValidationError::InvalidTerminus {
                    kind,
                    property: spec.name.to_string(),
                    key: key.to_string(),
                    reason,
                };

                if shape.is_mapping() {
                    match self.settings.get(key) {
                        None | Some(Value::Null) | Some(Value::Map(_)) => {}
                        Some(other) => errors.push(invalid(format!(
                            "must be a table, got {}",
                            other.type_name()
                        ))),
                    }
                    continue;
                }

                match self.settings.terminus(key) {
                    None => errors.push(ValidationError::MissingTerminus {
                        kind,
                        property: spec.name.to_string(),
                        key: key.to_string(),
                    }),
                    Some(Value::Str(token)) if token == INHERIT_TOKEN => {
                        errors.push(invalid("cannot itself be inherited".to_string()))
                    }
                    Some(value) => {
                        if let Some(members) = shape.members() {
                            let accepted = value
                                .as_str()
                                .is_some_and(|token| member_for(key, members, token).is_ok());
                            if !accepted {
                                errors.push(invalid(format!(
                                    "must be one of {}",
                                    members.join(", ")
                                )));
                            }
                        }
                    }
                }
            }
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
