//! Input converters shared by every settable field.
//!
//! Setters accept either a native collection or a delimited string and turn it
//! into the canonical in-memory shape, raising a validation or format error on
//! malformed input. `<<inherit>>` is recognised wherever the field is resolvable.

use crate::error::ItemError;
use crate::inherit::{Inheritable, Overlay, INHERIT_TOKEN};
use crate::value::{Mapping, Value};

/// Tokens accepted as `true` by boolean parsing
pub const TRUTHY_TOKENS: &[&str] = &["true", "1", "y", "yes"];

/// Keyword that clears a list or mapping field
const DELETE_KEYWORD: &str = "delete";

/// Wrap a converter so that the inherit token short-circuits to [`Inheritable::Inherit`].
pub fn inheritable<T>(
    value: Value,
    convert: impl FnOnce(Value) -> Result<T, ItemError>,
) -> Result<Inheritable<T>, ItemError> {
    if value.as_str() == Some(INHERIT_TOKEN) {
        return Ok(Inheritable::Inherit);
    }
    convert(value).map(Inheritable::Own)
}

/// Reject the inherit token for fields that cannot defer.
pub fn no_inherit(field: &str, value: &Value) -> Result<(), ItemError> {
    if value.as_str() == Some(INHERIT_TOKEN) {
        return Err(ItemError::validation(field, "this field cannot be inherited"));
    }
    Ok(())
}

/// `"a b,c"`, `["a", "b"]` or null into a list of strings.
pub fn string_or_list(field: &str, value: Value) -> Result<Vec<String>, ItemError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Str(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == DELETE_KEYWORD {
                return Ok(Vec::new());
            }
            Ok(trimmed
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect())
        }
        Value::List(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Str(s) => Ok(s),
                other => Err(ItemError::validation(
                    field,
                    format!("list entries must be str, got {}", other.type_name()),
                )),
            })
            .collect(),
        other => Err(ItemError::validation(
            field,
            format!("must be str or list, got {}", other.type_name()),
        )),
    }
}

/// `"a=b c=d"`, `"a=b,c=d"`, a mapping or null into an overlay.
///
/// With `allow_multiples`, a key given more than once collects its values into a list.
pub fn string_or_dict(field: &str, value: Value, allow_multiples: bool) -> Result<Overlay, ItemError> {
    match value {
        Value::Null => Ok(Overlay::new()),
        Value::Str(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == DELETE_KEYWORD {
                return Ok(Overlay::new());
            }
            Ok(Overlay::from(split_mapping(trimmed, allow_multiples)?))
        }
        Value::Map(mut map) => {
            map.remove("");
            Ok(Overlay::from(map))
        }
        other => Err(ItemError::validation(
            field,
            format!("must be str or dict, got {}", other.type_name()),
        )),
    }
}

/// A YAML document that must evaluate to a mapping, or a mapping directly.
pub fn yaml_dict(field: &str, value: Value) -> Result<Overlay, ItemError> {
    match value {
        Value::Null => Ok(Overlay::new()),
        Value::Str(s) => {
            if s.trim().is_empty() {
                return Ok(Overlay::new());
            }
            let parsed: Value =
                serde_yaml::from_str(&s).map_err(|e| ItemError::Format(e.to_string()))?;
            match parsed {
                Value::Map(map) => Ok(Overlay::from(map)),
                other => Err(ItemError::validation(
                    field,
                    format!("YAML must evaluate to a dictionary, got {}", other.type_name()),
                )),
            }
        }
        Value::Map(map) => Ok(Overlay::from(map)),
        other => Err(ItemError::validation(
            field,
            format!("must be str or dict, got {}", other.type_name()),
        )),
    }
}

/// Booleans, truthy strings, or 0/1 integers.
pub fn boolean(field: &str, value: Value) -> Result<bool, ItemError> {
    match value {
        Value::Bool(b) => Ok(b),
        Value::Int(i) => Ok(i != 0),
        Value::Str(s) => Ok(is_truthy(&s) || s.trim().eq_ignore_ascii_case("on")),
        other => Err(ItemError::validation(
            field,
            format!("must be bool, got {}", other.type_name()),
        )),
    }
}

pub fn is_truthy(token: &str) -> bool {
    let lowered = token.trim().to_lowercase();
    TRUTHY_TOKENS.contains(&lowered.as_str())
}

pub fn integer(field: &str, value: Value) -> Result<i64, ItemError> {
    match value {
        Value::Int(i) => Ok(i),
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ItemError::validation(field, format!("'{}' is not an integer", s))),
        other => Err(ItemError::validation(
            field,
            format!("must be int, got {}", other.type_name()),
        )),
    }
}

/// Floating point property values; numeric strings are accepted.
pub fn float(field: &str, value: Value) -> Result<f64, ItemError> {
    match value {
        Value::Float(f) => Ok(f),
        Value::Int(i) => Ok(i as f64),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ItemError::validation(field, format!("'{}' is not a number", s))),
        other => Err(ItemError::validation(
            field,
            format!("must be float, got {}", other.type_name()),
        )),
    }
}

/// Timestamps: numeric values only, and finite.
pub fn timestamp(field: &str, value: Value) -> Result<f64, ItemError> {
    let seconds = match value {
        Value::Float(f) => f,
        Value::Int(i) => i as f64,
        other => {
            return Err(ItemError::validation(
                field,
                format!("needs to be numeric, got {}", other.type_name()),
            ))
        }
    };
    if !seconds.is_finite() {
        return Err(ItemError::validation(field, "needs to be a finite number"));
    }
    Ok(seconds)
}

pub fn text(field: &str, value: Value) -> Result<String, ItemError> {
    match value {
        Value::Str(s) => Ok(s),
        Value::Null => Ok(String::new()),
        other => Err(ItemError::validation(
            field,
            format!("must be str, got {}", other.type_name()),
        )),
    }
}

/// Split a delimited `key=value` string.
///
/// Tokens are separated by whitespace (quotes group); a comma separates tokens only
/// when the text after it carries its own `=`, so `console=ttyS0,115200` stays whole.
pub fn split_mapping(input: &str, allow_multiples: bool) -> Result<Mapping, ItemError> {
    let mut result = Mapping::new();
    for token in split_tokens(input)? {
        for piece in split_commas(&token) {
            let (key, value) = match piece.split_once('=') {
                Some((key, value)) => (key.to_string(), Value::Str(value.to_string())),
                None => (piece, Value::Null),
            };
            if key.is_empty() {
                continue;
            }
            if allow_multiples {
                if let Some(existing) = result.get_mut(&key) {
                    match existing {
                        Value::List(values) => values.push(value),
                        other => {
                            let first = std::mem::take(other);
                            *other = Value::List(vec![first, value]);
                        }
                    }
                    continue;
                }
            }
            result.insert(key, value);
        }
    }
    Ok(result)
}

fn split_commas(token: &str) -> Vec<String> {
    let mut pieces: Vec<String> = Vec::new();
    for part in token.split(',') {
        if part.is_empty() {
            continue;
        }
        match pieces.last_mut() {
            Some(last) if !part.contains('=') => {
                last.push(',');
                last.push_str(part);
            }
            _ => pieces.push(part.to_string()),
        }
    }
    pieces
}

/// Shell-style word splitting: whitespace separates, quotes group, backslash escapes.
fn split_tokens(input: &str) -> Result<Vec<String>, ItemError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') | (None, '\\') => match chars.next() {
                Some(escaped) => {
                    current.push(escaped);
                    in_token = true;
                }
                None => return Err(ItemError::Format("no escaped character".to_string())),
            },
            (Some(_), c) => current.push(c),
            (None, '"') | (None, '\'') => {
                quote = Some(c);
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ItemError::Format(format!(
            "no closing quotation in '{}'",
            input
        )));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
