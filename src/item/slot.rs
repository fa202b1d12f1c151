//! Stored property values and their coercion from flat input.

use super::enums::member_for;
use super::schema::{Initial, Shape, INTERFACE_FIELDS};
use crate::error::ItemError;
use crate::inherit::{Inheritable, Overlay, INHERIT_TOKEN};
use crate::input;
use crate::value::{Mapping, Value};
use std::collections::BTreeMap;

/// In-memory state of one registry property
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Scalar(Inheritable<Value>),
    Enum(Inheritable<&'static str>),
    Mapping(Inheritable<Overlay>),
    /// Interface name to attribute record
    Interfaces(BTreeMap<String, Mapping>),
}

impl Slot {
    /// Initial state for a property of `shape`
    pub fn initial(shape: Shape, initial: Initial) -> Self {
        if let Some(members) = shape.members() {
            return match initial {
                Initial::Inherit => Slot::Enum(Inheritable::Inherit),
                Initial::Member(member) => Slot::Enum(Inheritable::Own(member)),
                _ => Slot::Enum(Inheritable::Own(members.first().copied().unwrap_or(""))),
            };
        }
        if shape.is_mapping() {
            return match initial {
                Initial::Inherit => Slot::Mapping(Inheritable::Inherit),
                _ => Slot::Mapping(Inheritable::Own(Overlay::new())),
            };
        }
        if shape == Shape::Interfaces {
            return Slot::Interfaces(BTreeMap::new());
        }
        let value = match initial {
            Initial::Inherit => return Slot::Scalar(Inheritable::Inherit),
            Initial::Text(text) => Value::from(text),
            Initial::Bool(flag) => Value::Bool(flag),
            Initial::Int(number) => Value::Int(number),
            Initial::Empty | Initial::Member(_) => empty_value(shape),
        };
        Slot::Scalar(Inheritable::Own(value))
    }

    /// Coerce flat input into the stored state of a `shape` property
    pub fn coerce(field: &str, shape: Shape, value: Value) -> Result<Self, ItemError> {
        let slot = match shape {
            Shape::Text => {
                input::no_inherit(field, &value)?;
                Slot::Scalar(Inheritable::Own(Value::Str(input::text(field, value)?)))
            }
            Shape::Bool => {
                input::no_inherit(field, &value)?;
                Slot::Scalar(Inheritable::Own(Value::Bool(input::boolean(field, value)?)))
            }
            Shape::Int => {
                input::no_inherit(field, &value)?;
                Slot::Scalar(Inheritable::Own(Value::Int(input::integer(field, value)?)))
            }
            Shape::Float => {
                input::no_inherit(field, &value)?;
                Slot::Scalar(Inheritable::Own(Value::Float(input::float(field, value)?)))
            }
            Shape::Enum(members) => {
                input::no_inherit(field, &value)?;
                Slot::Enum(Inheritable::Own(enum_member(field, members, value)?))
            }
            Shape::Map { allow_multiples } => {
                input::no_inherit(field, &value)?;
                Slot::Mapping(Inheritable::Own(input::string_or_dict(
                    field,
                    value,
                    allow_multiples,
                )?))
            }
            Shape::InheritText => Slot::Scalar(
                input::inheritable(value, |v| input::text(field, v))?.map(Value::Str),
            ),
            Shape::InheritList => Slot::Scalar(
                input::inheritable(value, |v| input::string_or_list(field, v))?
                    .map(|items| Value::str_list(&items)),
            ),
            Shape::InheritBool => Slot::Scalar(
                input::inheritable(value, |v| input::boolean(field, v))?.map(Value::Bool),
            ),
            Shape::InheritInt => Slot::Scalar(
                input::inheritable(value, |v| input::integer(field, v))?.map(Value::Int),
            ),
            Shape::InheritFloat => Slot::Scalar(
                input::inheritable(value, |v| input::float(field, v))?.map(Value::Float),
            ),
            Shape::InheritEnum(members) => Slot::Enum(input::inheritable(value, |v| {
                enum_member(field, members, v)
            })?),
            Shape::InheritMap { allow_multiples } => Slot::Mapping(input::inheritable(value, |v| {
                input::string_or_dict(field, v, allow_multiples)
            })?),
            Shape::InheritYamlMap => {
                Slot::Mapping(input::inheritable(value, |v| input::yaml_dict(field, v))?)
            }
            Shape::Interfaces => Slot::Interfaces(interfaces(field, value)?),
            Shape::Derived(_) => {
                return Err(ItemError::ReadOnly {
                    property: field.to_string(),
                })
            }
        };
        Ok(slot)
    }

    /// Flat form; the inherited state is spelled as the inherit token
    pub fn to_value(&self) -> Value {
        match self {
            Slot::Scalar(Inheritable::Own(value)) => value.clone(),
            Slot::Enum(Inheritable::Own(member)) => Value::from(*member),
            Slot::Mapping(Inheritable::Own(overlay)) => Value::Map(overlay.to_mapping()),
            Slot::Scalar(Inheritable::Inherit)
            | Slot::Enum(Inheritable::Inherit)
            | Slot::Mapping(Inheritable::Inherit) => Value::from(INHERIT_TOKEN),
            Slot::Interfaces(records) => Value::Map(
                records
                    .iter()
                    .map(|(name, record)| (name.clone(), Value::Map(record.clone())))
                    .collect(),
            ),
        }
    }

    pub fn is_inherit(&self) -> bool {
        match self {
            Slot::Scalar(state) => state.is_inherit(),
            Slot::Enum(state) => state.is_inherit(),
            Slot::Mapping(state) => state.is_inherit(),
            Slot::Interfaces(_) => false,
        }
    }
}

fn empty_value(shape: Shape) -> Value {
    match shape {
        Shape::Bool | Shape::InheritBool => Value::Bool(false),
        Shape::Int | Shape::InheritInt => Value::Int(0),
        Shape::Float | Shape::InheritFloat => Value::Float(0.0),
        Shape::InheritList => Value::List(Vec::new()),
        _ => Value::Str(String::new()),
    }
}

fn enum_member(
    field: &str,
    members: &'static [&'static str],
    value: Value,
) -> Result<&'static str, ItemError> {
    match value {
        Value::Str(token) => member_for(field, members, &token),
        other => Err(ItemError::validation(
            field,
            format!("enum tokens must be str, got {}", other.type_name()),
        )),
    }
}

fn interfaces(field: &str, value: Value) -> Result<BTreeMap<String, Mapping>, ItemError> {
    let records = match value {
        Value::Null => return Ok(BTreeMap::new()),
        Value::Map(records) => records,
        other => {
            return Err(ItemError::validation(
                field,
                format!("must be a dict of interfaces, got {}", other.type_name()),
            ))
        }
    };

    let mut result = BTreeMap::new();
    for (name, record) in records {
        let Value::Map(record) = record else {
            return Err(ItemError::validation(
                field,
                format!("interface '{}' must be a dict", name),
            ));
        };
        if let Some(unknown) = record
            .keys()
            .find(|key| !INTERFACE_FIELDS.contains(&key.as_str()))
        {
            return Err(ItemError::validation(
                field,
                format!("interface '{}' has unknown attribute '{}'", name, unknown),
            ));
        }
        result.insert(name, record);
    }
    Ok(result)
}
