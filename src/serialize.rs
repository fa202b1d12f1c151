//! Flat dict conversion
//!
//! `to_raw_dict` emits every registry field as stored (inherited state spelled
//! as the inherit token), `to_resolved_dict` swaps inherited values for their
//! effective ones, and `from_dict` / `deserialize` set fields back through the
//! registry. `serialize` is the persisted form: no legacy aliases and no derived
//! values.

use crate::error::ItemError;
use crate::item::{Access, Item, Shape, Slot};
use crate::tree::ItemLookup;
use crate::value::{Mapping, Value};
use tracing::trace;

/// API-compatibility aliases: (canonical field, alias emitted alongside it)
pub const LEGACY_ALIASES: &[(&str, &str)] = &[("autoinstall_meta", "ks_meta"), ("autoinstall", "kickstart")];

/// Remove the API-compatibility aliases from a flat dict
pub fn strip_legacy_keys(dictionary: &mut Mapping) {
    for (_, alias) in LEGACY_ALIASES {
        dictionary.remove(*alias);
    }
}

fn add_legacy_aliases(dictionary: &mut Mapping) {
    for (field, alias) in LEGACY_ALIASES {
        if let Some(value) = dictionary.get(*field).cloned() {
            dictionary.insert(alias.to_string(), value);
        }
    }
}

impl Item {
    /// Every registry field as stored, plus legacy aliases and derived values
    pub fn to_raw_dict(&self) -> Mapping {
        let mut dictionary: Mapping = self
            .schema()
            .fields()
            .iter()
            .map(|spec| (spec.name.to_string(), self.raw_value(spec)))
            .collect();
        add_legacy_aliases(&mut dictionary);
        dictionary
    }

    /// Like [`Item::to_raw_dict`], with every inherited value resolved
    pub fn to_resolved_dict(&self, lookup: &dyn ItemLookup) -> Result<Mapping, ItemError> {
        let mut dictionary = Mapping::new();
        for spec in self.schema().fields() {
            let value = match spec.access {
                Access::Property(Shape::InheritMap { .. } | Shape::InheritYamlMap) => {
                    Value::Map(self.resolve_mapping(spec.name, lookup)?)
                }
                Access::Property(Shape::InheritEnum(_))
                    if self.slot(spec.name).is_some_and(Slot::is_inherit) =>
                {
                    Value::from(self.resolve_enum_token(spec.name, lookup)?)
                }
                Access::Property(shape)
                    if shape.is_resolvable()
                        && self.slot(spec.name).is_some_and(Slot::is_inherit) =>
                {
                    self.resolve_scalar(spec.resolution_name(), lookup)?
                }
                _ => self.raw_value(spec),
            };
            dictionary.insert(spec.name.to_string(), value);
        }
        add_legacy_aliases(&mut dictionary);
        Ok(dictionary)
    }

    /// Set fields from a flat dict; keys are matched case-insensitively.
    ///
    /// Keys the kind does not declare are collected and reported together after
    /// every known key has been applied.
    pub fn from_dict(&mut self, dictionary: &Mapping) -> Result<(), ItemError> {
        let mut leftover = Vec::new();
        for (key, value) in dictionary {
            let lowered = key.to_lowercase();
            if self.has_property(&lowered) {
                self.set(&lowered, value.clone())?;
            } else {
                leftover.push(key.clone());
            }
        }
        if !leftover.is_empty() {
            return Err(ItemError::UnknownFields(leftover));
        }
        trace!(item = %self.name, keys = dictionary.len(), "Applied flat dict");
        Ok(())
    }

    /// Persisted form of the item
    pub fn serialize(&self) -> Mapping {
        let mut dictionary = self.to_raw_dict();
        strip_legacy_keys(&mut dictionary);
        for spec in self.schema().fields() {
            if matches!(spec.access, Access::Property(Shape::Derived(_))) {
                dictionary.remove(spec.name);
            }
        }
        dictionary
    }

    /// Restore fields from a persisted dict
    pub fn deserialize(&mut self, dictionary: &Mapping) -> Result<(), ItemError> {
        self.from_dict(dictionary)
    }

    /// Raw values of `fields`, in order, for external sorting; absent fields sort as `""`
    pub fn sort_key(&self, fields: &[&str]) -> Vec<Value> {
        let dictionary = self.to_raw_dict();
        fields
            .iter()
            .map(|field| dictionary.get(*field).cloned().unwrap_or_else(|| Value::from("")))
            .collect()
    }
}
