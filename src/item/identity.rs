//! Identity fields: uid, name, comment and timestamps, plus validation.

use super::{Item, Slot};
use crate::error::ItemError;
use crate::inherit::Inheritable;
use crate::value::Value;
use chrono::Utc;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use uuid::Uuid;

/// Characters allowed in item names (and therefore in parent and child references)
pub static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_\-.:]*$").expect("name pattern is a valid regex")
});

/// Random 32-character hex identifier
pub fn new_uid() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Reject names outside [`NAME_PATTERN`]
pub fn check_name(field: &str, name: &str) -> Result<(), ItemError> {
    if NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(ItemError::validation(
            field,
            format!(
                "invalid characters in '{}'; only letters, digits, '_', '-', '.' and ':' are allowed",
                name
            ),
        ))
    }
}

impl Item {
    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub(crate) fn set_uid(&mut self, uid: String) -> Result<(), ItemError> {
        if uid.trim().is_empty() {
            return Err(ItemError::validation("uid", "must not be empty"));
        }
        self.uid = uid;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the item; the old name is kept when the new one is rejected
    pub fn set_name(&mut self, name: &str) -> Result<(), ItemError> {
        check_name("name", name)?;
        self.name = name.to_string();
        Ok(())
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// Creation time in seconds since the epoch
    pub fn created_at(&self) -> f64 {
        self.ctime
    }

    pub fn set_created_at(&mut self, seconds: f64) -> Result<(), ItemError> {
        self.ctime = finite("ctime", seconds)?;
        Ok(())
    }

    /// Last modification time in seconds since the epoch
    pub fn modified_at(&self) -> f64 {
        self.mtime
    }

    pub fn set_modified_at(&mut self, seconds: f64) -> Result<(), ItemError> {
        self.mtime = finite("mtime", seconds)?;
        Ok(())
    }

    /// Stamp the modification time with the current time
    pub fn touch(&mut self) {
        self.mtime = Utc::now().timestamp_micros() as f64 / 1_000_000.0;
    }

    /// Check the item is complete enough to be stored
    pub fn validate(&self) -> Result<(), ItemError> {
        if self.name.is_empty() {
            return Err(ItemError::validation("name", "a name is required"));
        }
        for field in self.kind.required_fields() {
            if is_blank(&self.get(field)?) {
                return Err(ItemError::validation(field, "is required"));
            }
        }
        Ok(())
    }

    /// Deep copy under a fresh uid
    pub fn make_clone(&self) -> Item {
        let mut copy = self.clone();
        copy.uid = new_uid();
        copy.conceptual_parent = Mutex::new(None);
        copy
    }

    /// Whether `field` currently holds the inherited state
    pub fn is_inherited(&self, field: &str) -> Result<bool, ItemError> {
        self.spec(field)?;
        Ok(self.slot(field).is_some_and(Slot::is_inherit))
    }

    /// Reset a resolvable property back to the inherited state
    pub fn inherit(&mut self, field: &str) -> Result<(), ItemError> {
        let spec = self.spec(field)?;
        if !spec.shape().is_some_and(|shape| shape.is_resolvable()) {
            return Err(ItemError::validation(field, "this field cannot be inherited"));
        }
        let slot = match self.slot(field) {
            Some(Slot::Enum(_)) => Slot::Enum(Inheritable::Inherit),
            Some(Slot::Mapping(_)) => Slot::Mapping(Inheritable::Inherit),
            _ => Slot::Scalar(Inheritable::Inherit),
        };
        self.slots.insert(spec.name, slot);
        Ok(())
    }
}

fn finite(field: &str, seconds: f64) -> Result<f64, ItemError> {
    if seconds.is_finite() {
        Ok(seconds)
    } else {
        Err(ItemError::validation(field, "needs to be a finite number"))
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Str(s) => s.trim().is_empty(),
        _ => false,
    }
}
