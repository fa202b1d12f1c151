//! Property Resolution
//!
//! Computes the effective value of a property by walking the chain
//! item → logical parent(s) → settings → settings `default_<key>`.
//!
//! Scalars and enums stop at the first link holding its own value. Mappings are
//! merged instead: every link contributes an overlay on top of what its
//! fallback resolved to, and tombstoned keys are dropped at the end.

use crate::error::ItemError;
use crate::inherit::{merge_layers, Inheritable, Overlay, INHERIT_TOKEN};
use crate::input;
use crate::item::enums::member_for;
use crate::item::{ConvertibleEnum, FieldSpec, Item, Shape, Slot};
use crate::tree::{ItemLookup, Visited};
use crate::value::{Mapping, Value};
use tracing::trace;

/// Prefix of the proxy settings that all resolve through the `proxy` field
pub const PROXY_URL_PREFIX: &str = "proxy_url_";

/// The stored field a property lives in, and the settings terminus it falls back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyKeys<'p> {
    pub field: &'p str,
    pub settings_key: &'p str,
}

impl Item {
    /// Map a property name onto its stored field and settings key
    pub fn property_keys<'p>(&self, property: &'p str) -> PropertyKeys<'p> {
        let field = if property.starts_with(PROXY_URL_PREFIX) {
            "proxy"
        } else {
            property
        };
        let settings_key = self
            .schema()
            .resolvable(property)
            .and_then(|spec| spec.settings_key)
            .unwrap_or(property);
        PropertyKeys {
            field,
            settings_key,
        }
    }

    /// Effective value of a scalar property
    pub fn resolve_scalar(
        &self,
        property: &str,
        lookup: &dyn ItemLookup,
    ) -> Result<Value, ItemError> {
        let keys = self.property_keys(property);
        if let Some(value) = self.walk_chain(keys.field, lookup, Item::scalar_state)? {
            return Ok(value);
        }
        match self.settings.terminus(keys.settings_key) {
            Some(Value::Str(token)) if token == INHERIT_TOKEN => Err(self.unresolved(property)),
            Some(value) => self.coerce_terminus(keys, value),
            None => Err(self.unresolved(property)),
        }
    }

    /// Effective member token of an enum property
    pub fn resolve_enum_token(
        &self,
        property: &str,
        lookup: &dyn ItemLookup,
    ) -> Result<&'static str, ItemError> {
        let members = self
            .spec(property)?
            .shape()
            .and_then(|shape| shape.members())
            .ok_or_else(|| ItemError::wrong_shape(property, "an enum"))?;
        if let Some(member) = self.walk_chain(property, lookup, Item::enum_state)? {
            return Ok(member);
        }
        let settings_key = self.property_keys(property).settings_key;
        match self.settings.terminus(settings_key) {
            Some(Value::Str(token)) if token == INHERIT_TOKEN => Err(self.unresolved(property)),
            Some(Value::Str(token)) => member_for(settings_key, members, token),
            Some(other) => Err(ItemError::validation(
                settings_key,
                format!("enum settings must be str, got {}", other.type_name()),
            )),
            None => Err(self.unresolved(property)),
        }
    }

    /// Effective value of an enum property as a typed enum
    pub fn resolve_enum<E: ConvertibleEnum>(
        &self,
        property: &str,
        lookup: &dyn ItemLookup,
    ) -> Result<E, ItemError> {
        let token = self.resolve_enum_token(property, lookup)?;
        E::to_enum(property, token)
    }

    /// Effective value of a mapping property, tombstones annihilated
    pub fn resolve_mapping(
        &self,
        property: &str,
        lookup: &dyn ItemLookup,
    ) -> Result<Mapping, ItemError> {
        let resolvable = self
            .spec(property)?
            .shape()
            .is_some_and(|shape| shape.is_mapping() && shape.is_resolvable());
        if !resolvable {
            return Err(ItemError::wrong_shape(property, "an inheritable dict"));
        }
        let mut visited = Visited::start(self);
        self.resolve_mapping_from(property, lookup, &mut visited)
    }

    /// Effective owner list
    pub fn owners(&self, lookup: &dyn ItemLookup) -> Result<Vec<String>, ItemError> {
        let value = self.resolve_scalar("owners", lookup)?;
        input::string_or_list("owners", value)
    }

    fn resolve_mapping_from(
        &self,
        property: &str,
        lookup: &dyn ItemLookup,
        visited: &mut Visited,
    ) -> Result<Mapping, ItemError> {
        let own = self.mapping_state(property)?;
        let fallback = match self.parent(lookup) {
            Some(parent) if parent.has_property(property) => {
                visited.enter(parent)?;
                parent.resolve_mapping_from(property, lookup, visited)?
            }
            _ => match self.settings.get(property) {
                Some(Value::Map(map)) => map.clone(),
                Some(Value::Null) | None => Mapping::new(),
                Some(_) => return Err(ItemError::wrong_shape(property, "a dict in the settings")),
            },
        };
        Ok(merge_layers(fallback, own.own().copied()))
    }

    /// Climb parents until one holds its own value for `field`
    fn walk_chain<T>(
        &self,
        field: &str,
        lookup: &dyn ItemLookup,
        state: impl Fn(&Item, &str) -> Result<Inheritable<T>, ItemError>,
    ) -> Result<Option<T>, ItemError> {
        let mut visited = Visited::start(self);
        let mut current = self;
        loop {
            if let Inheritable::Own(value) = state(current, field)? {
                trace!(item = %current.name, field, "resolved from item");
                return Ok(Some(value));
            }
            match current.parent(lookup) {
                Some(parent) if parent.has_property(field) => {
                    visited.enter(parent)?;
                    current = parent;
                }
                _ => return Ok(None),
            }
        }
    }

    fn scalar_state(&self, field: &str) -> Result<Inheritable<Value>, ItemError> {
        match self.slot(field) {
            Some(Slot::Scalar(state)) => Ok(state.clone()),
            Some(Slot::Enum(state)) => Ok(state.clone().map(Value::from)),
            Some(Slot::Mapping(_)) | Some(Slot::Interfaces(_)) => {
                Err(ItemError::wrong_shape(field, "a scalar"))
            }
            None => self.get(field).map(Inheritable::Own),
        }
    }

    fn enum_state(&self, field: &str) -> Result<Inheritable<&'static str>, ItemError> {
        match self.slot(field) {
            Some(Slot::Enum(state)) => Ok(state.clone()),
            Some(_) => Err(ItemError::wrong_shape(field, "an enum")),
            None => Err(self.unknown_attribute(field)),
        }
    }

    fn mapping_state(&self, field: &str) -> Result<Inheritable<&Overlay>, ItemError> {
        match self.slot(field) {
            Some(Slot::Mapping(state)) => Ok(state.as_ref()),
            Some(_) => Err(ItemError::wrong_shape(field, "a dict")),
            None if self.has_property(field) => Err(ItemError::wrong_shape(field, "a dict")),
            None => Err(self.unknown_attribute(field)),
        }
    }

    /// List-shaped termini may be written as delimited strings in the settings
    fn coerce_terminus(&self, keys: PropertyKeys<'_>, value: &Value) -> Result<Value, ItemError> {
        match self.schema().field(keys.field).and_then(FieldSpec::shape) {
            Some(Shape::InheritList) => input::string_or_list(keys.settings_key, value.clone())
                .map(|items| Value::str_list(&items)),
            _ => Ok(value.clone()),
        }
    }

    fn unresolved(&self, property: &str) -> ItemError {
        ItemError::UnresolvedInheritance {
            item: self.name.clone(),
            property: property.to_string(),
        }
    }
}
