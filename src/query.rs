//! Item matching for `find` style queries.
//!
//! Criteria are compared against the item's raw dict. A criterion value starting
//! with `~` negates the comparison for that key.

use crate::error::ItemError;
use crate::input::{is_truthy, split_mapping, string_or_list};
use crate::item::schema::INTERFACE_FIELDS;
use crate::item::Item;
use crate::value::{Mapping, Value};
use glob::{MatchOptions, Pattern};
use std::collections::BTreeMap;

/// Query criteria: field name to expected value; `None` only checks presence
pub type Criteria = BTreeMap<String, Option<String>>;

const NEGATION_PREFIX: char = '~';
const GLOB_CHARS: &[char] = &['*', '?', '['];

/// Whether `key` addresses interface records rather than a top-level field
pub fn is_interface_key(key: &str) -> bool {
    key == "interface" || INTERFACE_FIELDS.contains(&key)
}

impl Item {
    /// True when every criterion matches
    pub fn find_match(&self, criteria: &Criteria, lenient: bool) -> Result<bool, ItemError> {
        let data = self.to_raw_dict();
        for (key, value) in criteria {
            let matched = match value.as_deref() {
                Some(expected) if expected.starts_with(NEGATION_PREFIX) => {
                    let expected = &expected[NEGATION_PREFIX.len_utf8()..];
                    !find_match_single_key(&data, key, Some(expected), lenient)?
                }
                expected => find_match_single_key(&data, key, expected, lenient)?,
            };
            if !matched {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Match one criterion against a raw dict
pub fn find_match_single_key(
    data: &Mapping,
    key: &str,
    value: Option<&str>,
    lenient: bool,
) -> Result<bool, ItemError> {
    let mut key_found_already = false;
    if let Some(interfaces) = data.get("interfaces") {
        if is_interface_key(key) {
            key_found_already = true;
            if let Some(records) = interfaces.as_map() {
                for (name, record) in records {
                    if value == Some(name.as_str()) {
                        return Ok(true);
                    }
                    let stored = record.as_map().and_then(|record| record.get(key));
                    if let (Some(expected), Some(stored)) = (value, stored) {
                        if find_compare(expected, stored)? {
                            return Ok(true);
                        }
                    }
                }
            }
        }
    }

    let Some(stored) = data.get(key) else {
        if !key_found_already && !lenient {
            return Ok(false);
        }
        return Ok(value.is_none());
    };

    match value {
        None => Ok(true),
        Some(expected) => find_compare(expected, stored),
    }
}

/// Compare a criterion string against a stored value by the stored value's shape
pub fn find_compare(criterion: &str, stored: &Value) -> Result<bool, ItemError> {
    match stored {
        Value::Str(text) => Ok(string_matches(criterion, text)),
        Value::List(items) => {
            let wanted = string_or_list("find", Value::from(criterion))?;
            Ok(wanted
                .iter()
                .all(|token| items.iter().any(|item| item.as_str() == Some(token.as_str()))))
        }
        Value::Map(map) => {
            let wanted = split_mapping(criterion, true)?;
            Ok(wanted.iter().all(|(key, value)| map.get(key) == Some(value)))
        }
        Value::Bool(flag) => Ok(is_truthy(criterion) == *flag),
        other => Err(ItemError::TypeComparison(other.type_name().to_string())),
    }
}

/// Case-insensitive equality, or a wildcard match when the criterion has glob characters
fn string_matches(criterion: &str, stored: &str) -> bool {
    let criterion = criterion.to_lowercase();
    let stored = stored.to_lowercase();
    if !criterion.contains(GLOB_CHARS) {
        return criterion == stored;
    }
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    match Pattern::new(&collapse_stars(&criterion)) {
        Ok(pattern) => pattern.matches_with(&stored, options),
        Err(_) => criterion == stored,
    }
}

/// `glob` only accepts `**` as a whole path component; a run of stars means the same as one
fn collapse_stars(pattern: &str) -> String {
    let mut collapsed = String::with_capacity(pattern.len());
    for ch in pattern.chars() {
        if ch == '*' && collapsed.ends_with('*') {
            continue;
        }
        collapsed.push(ch);
    }
    collapsed
}
