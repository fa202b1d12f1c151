//! Inheritance value model
//!
//! A resolvable property either holds its own value or defers to its fallback
//! chain. Mapping properties additionally carry per-key tombstones so a child can
//! suppress a key it inherits without knowing the inherited value.

use crate::value::{Mapping, Value};
use std::collections::BTreeMap;

/// External spelling of [`Inheritable::Inherit`] in flat mappings and input strings.
pub const INHERIT_TOKEN: &str = "<<inherit>>";

/// External spelling of [`MapEntry::Remove`] as a mapping value.
pub const REMOVAL_MARKER: &str = "~";

/// Stored state of a resolvable property
#[derive(Debug, Clone, PartialEq)]
pub enum Inheritable<T> {
    /// Set locally; always wins over anything further up the chain
    Own(T),
    /// Not set locally; defer to the parent, then the settings
    Inherit,
}

impl<T> Inheritable<T> {
    pub fn is_inherit(&self) -> bool {
        matches!(self, Inheritable::Inherit)
    }

    pub fn own(&self) -> Option<&T> {
        match self {
            Inheritable::Own(value) => Some(value),
            Inheritable::Inherit => None,
        }
    }

    pub fn as_ref(&self) -> Inheritable<&T> {
        match self {
            Inheritable::Own(value) => Inheritable::Own(value),
            Inheritable::Inherit => Inheritable::Inherit,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Inheritable<U> {
        match self {
            Inheritable::Own(value) => Inheritable::Own(f(value)),
            Inheritable::Inherit => Inheritable::Inherit,
        }
    }
}

/// One key of a mapping overlay
#[derive(Debug, Clone, PartialEq)]
pub enum MapEntry {
    Set(Value),
    /// Tombstone: drop this key from the merged result
    Remove,
}

impl MapEntry {
    /// Interpret a flat value, recognising the removal marker
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Str(s) if s == REMOVAL_MARKER => MapEntry::Remove,
            other => MapEntry::Set(other),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            MapEntry::Set(value) => value.clone(),
            MapEntry::Remove => Value::Str(REMOVAL_MARKER.to_string()),
        }
    }
}

/// A locally stored mapping, layered over the inherited one key by key
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay(BTreeMap<String, MapEntry>);

impl Overlay {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), MapEntry::Set(value));
    }

    /// Mark `key` for removal from whatever this overlay is merged onto
    pub fn remove_key(&mut self, key: impl Into<String>) {
        self.0.insert(key.into(), MapEntry::Remove);
    }

    pub fn get(&self, key: &str) -> Option<&MapEntry> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MapEntry)> {
        self.0.iter()
    }

    /// Flat form, with tombstones spelled as the removal marker
    pub fn to_mapping(&self) -> Mapping {
        self.0
            .iter()
            .map(|(key, entry)| (key.clone(), entry.to_value()))
            .collect()
    }

    /// Apply this overlay on top of `merged`, last writer wins per key
    pub fn apply_to(&self, merged: &mut BTreeMap<String, MapEntry>) {
        for (key, entry) in &self.0 {
            merged.insert(key.clone(), entry.clone());
        }
    }
}

impl From<Mapping> for Overlay {
    fn from(mapping: Mapping) -> Self {
        Self(
            mapping
                .into_iter()
                .map(|(key, value)| (key, MapEntry::from_value(value)))
                .collect(),
        )
    }
}

impl FromIterator<(String, MapEntry)> for Overlay {
    fn from_iter<T: IntoIterator<Item = (String, MapEntry)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Merge `overlay` onto `fallback` and annihilate tombstoned keys.
///
/// The fallback is taken as a flat mapping, so a removal marker that reached it
/// from the settings is honoured as well.
pub fn merge_layers(fallback: Mapping, overlay: Option<&Overlay>) -> Mapping {
    let mut merged: BTreeMap<String, MapEntry> = fallback
        .into_iter()
        .map(|(key, value)| (key, MapEntry::from_value(value)))
        .collect();
    if let Some(overlay) = overlay {
        overlay.apply_to(&mut merged);
    }
    annihilate(merged)
}

/// Drop every tombstoned entry, keeping the rest in key order
pub fn annihilate(merged: BTreeMap<String, MapEntry>) -> Mapping {
    merged
        .into_iter()
        .filter_map(|(key, entry)| match entry {
            MapEntry::Set(value) => Some((key, value)),
            MapEntry::Remove => None,
        })
        .collect()
}
