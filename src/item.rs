//! Item Model
//!
//! An [`Item`] is one named, uniquely identified configuration object of a
//! concrete [`ItemKind`]. Its properties are declared by the kind's [`Schema`]
//! and stored as [`Slot`]s, so the generic operations (resolution, flat dicts,
//! queries) never need to know the concrete kind.

pub mod derived;
pub mod enums;
pub mod identity;
pub mod kind;
pub mod schema;
pub mod slot;

pub use enums::{Arch, ConvertibleEnum, PowerType, VirtDiskDriver};
pub use kind::ItemKind;
pub use schema::{Access, CoreField, Derivation, FieldSpec, Initial, Schema, Shape};
pub use slot::Slot;

use crate::config::Settings;
use crate::error::ItemError;
use crate::input;
use crate::value::Value;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A configuration object taking part in the inheritance tree
#[derive(Debug)]
pub struct Item {
    pub(crate) kind: ItemKind,
    pub(crate) uid: String,
    pub(crate) name: String,
    pub(crate) comment: String,
    pub(crate) ctime: f64,
    pub(crate) mtime: f64,
    pub(crate) parent: String,
    pub(crate) depth: i64,
    pub(crate) is_subobject: bool,
    pub(crate) children: Vec<String>,
    pub(crate) slots: BTreeMap<&'static str, Slot>,
    pub(crate) settings: Arc<Settings>,
    /// Name of the last computed conceptual parent
    pub(crate) conceptual_parent: Mutex<Option<String>>,
}

impl Item {
    /// A fresh item with every property in its initial state
    pub fn new(kind: ItemKind, settings: Arc<Settings>) -> Self {
        let slots = kind
            .schema()
            .fields()
            .iter()
            .filter_map(|spec| match spec.access {
                Access::Property(Shape::Derived(_)) | Access::Core(_) => None,
                Access::Property(shape) => Some((spec.name, Slot::initial(shape, spec.initial))),
            })
            .collect();

        Self {
            kind,
            uid: identity::new_uid(),
            name: String::new(),
            comment: String::new(),
            ctime: 0.0,
            mtime: 0.0,
            parent: String::new(),
            depth: 0,
            is_subobject: false,
            children: Vec::new(),
            slots,
            settings,
            conceptual_parent: Mutex::new(None),
        }
    }

    /// A fresh item whose parent is of its own kind
    pub fn new_subobject(kind: ItemKind, settings: Arc<Settings>) -> Self {
        let mut item = Self::new(kind, settings);
        item.is_subobject = kind.has_tree();
        item
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn schema(&self) -> &'static Schema {
        self.kind.schema()
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Whether `field` is declared for this item's kind
    pub fn has_property(&self, field: &str) -> bool {
        self.schema().has(field)
    }

    pub(crate) fn spec(&self, field: &str) -> Result<&'static FieldSpec, ItemError> {
        self.schema()
            .field(field)
            .ok_or_else(|| self.unknown_attribute(field))
    }

    pub(crate) fn unknown_attribute(&self, property: &str) -> ItemError {
        ItemError::UnknownAttribute {
            kind: self.kind.to_string(),
            item: self.name.clone(),
            property: property.to_string(),
        }
    }

    pub(crate) fn slot(&self, field: &str) -> Option<&Slot> {
        self.slots.get(field)
    }

    /// Set any registry field from a flat value
    pub fn set(&mut self, field: &str, value: Value) -> Result<(), ItemError> {
        let spec = self.spec(field)?;
        match spec.access {
            Access::Core(core) => self.set_core(core, value),
            Access::Property(shape) => {
                let slot = Slot::coerce(spec.name, shape, value)?;
                self.slots.insert(spec.name, slot);
                Ok(())
            }
        }
    }

    /// Flat raw value of any registry field; inherited state is the inherit token
    pub fn get(&self, field: &str) -> Result<Value, ItemError> {
        let spec = self.spec(field)?;
        Ok(self.raw_value(spec))
    }

    pub(crate) fn raw_value(&self, spec: &FieldSpec) -> Value {
        match spec.access {
            Access::Core(core) => self.core_value(core),
            Access::Property(Shape::Derived(derivation)) => self.derive(derivation),
            Access::Property(_) => self
                .slot(spec.name)
                .map(Slot::to_value)
                .unwrap_or_default(),
        }
    }

    fn core_value(&self, core: CoreField) -> Value {
        match core {
            CoreField::Uid => Value::from(self.uid.as_str()),
            CoreField::Name => Value::from(self.name.as_str()),
            CoreField::Comment => Value::from(self.comment.as_str()),
            CoreField::Ctime => Value::Float(self.ctime),
            CoreField::Mtime => Value::Float(self.mtime),
            CoreField::Parent => Value::from(self.parent.as_str()),
            CoreField::Depth => Value::Int(self.depth),
            CoreField::IsSubobject => Value::Bool(self.is_subobject),
            CoreField::Children => Value::str_list(self.children()),
        }
    }

    fn set_core(&mut self, core: CoreField, value: Value) -> Result<(), ItemError> {
        match core {
            CoreField::Uid => {
                input::no_inherit("uid", &value)?;
                let uid = input::text("uid", value)?;
                self.set_uid(uid)
            }
            CoreField::Name => {
                input::no_inherit("name", &value)?;
                match value {
                    Value::Str(name) => self.set_name(&name),
                    other => Err(ItemError::validation(
                        "name",
                        format!("must be of type str, got {}", other.type_name()),
                    )),
                }
            }
            CoreField::Comment => {
                let comment = input::text("comment", value)?;
                self.set_comment(comment);
                Ok(())
            }
            CoreField::Ctime => self.set_created_at(input::timestamp("ctime", value)?),
            CoreField::Mtime => self.set_modified_at(input::timestamp("mtime", value)?),
            CoreField::Parent => {
                input::no_inherit("parent", &value)?;
                let parent = input::text("parent", value)?;
                self.set_parent(&parent)
            }
            CoreField::Depth => match value {
                Value::Int(depth) => self.set_depth(depth),
                other => Err(ItemError::validation(
                    "depth",
                    format!("must be int, got {}", other.type_name()),
                )),
            },
            CoreField::IsSubobject => match value {
                Value::Bool(flag) => self.set_is_subobject(flag),
                other => Err(ItemError::validation(
                    "is_subobject",
                    format!("must be bool, got {}", other.type_name()),
                )),
            },
            CoreField::Children => {
                let children = input::string_or_list("children", value)?;
                self.set_children(children);
                Ok(())
            }
        }
    }

    fn derive(&self, derivation: Derivation) -> Value {
        let url = self
            .slot(derivation.source_field())
            .and_then(|slot| match slot {
                Slot::Scalar(state) => state.own().and_then(Value::as_str),
                _ => None,
            })
            .unwrap_or_default();
        Value::Str(derived::grub_remote_path(url).unwrap_or_default())
    }
}

/// A clone is the same logical item: it keeps the uid and compares equal to the
/// original. Use [`Item::make_clone`] for a distinct item under a fresh uid.
impl Clone for Item {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            uid: self.uid.clone(),
            name: self.name.clone(),
            comment: self.comment.clone(),
            ctime: self.ctime,
            mtime: self.mtime,
            parent: self.parent.clone(),
            depth: self.depth,
            is_subobject: self.is_subobject,
            children: self.children.clone(),
            slots: self.slots.clone(),
            settings: Arc::clone(&self.settings),
            conceptual_parent: Mutex::new(self.conceptual_parent.lock().clone()),
        }
    }
}

/// Items are the same item when their uids match
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uid.hash(state);
    }
}
