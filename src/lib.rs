//! Lineage: Inheritable Configuration Items
//!
//! Named configuration objects (distros, profiles, systems, templates) arranged
//! in a logical parent tree. A property left unset on an item is resolved by
//! walking the item's parents and finally the global settings, with mapping
//! properties merged layer by layer.

pub mod config;
pub mod error;
pub mod inherit;
pub mod input;
pub mod item;
pub mod logging;
pub mod query;
pub mod resolve;
pub mod serialize;
pub mod tree;
pub mod value;

pub use config::{ConfigLoader, LineageConfig, Settings, ValidationError};
pub use error::{ItemError, SettingsError};
pub use inherit::{Inheritable, MapEntry, Overlay, INHERIT_TOKEN, REMOVAL_MARKER};
pub use item::{Item, ItemKind};
pub use logging::{init_logging, LoggingConfig};
pub use query::Criteria;
pub use tree::{ItemCatalog, ItemLookup, Layer};
pub use value::{Mapping, Value};
