//! Parent and children references stored on an item.

use super::ItemLookup;
use crate::error::ItemError;
use crate::item::identity::check_name;
use crate::item::Item;
use tracing::{debug, warn};

impl Item {
    /// Name of the logical parent; empty for roots
    pub fn parent_name(&self) -> &str {
        &self.parent
    }

    pub fn set_parent(&mut self, parent: &str) -> Result<(), ItemError> {
        self.require_tree("parent")?;
        check_name("parent", parent)?;
        self.parent = parent.to_string();
        *self.conceptual_parent.lock() = None;
        Ok(())
    }

    pub fn depth(&self) -> i64 {
        self.depth
    }

    pub fn set_depth(&mut self, depth: i64) -> Result<(), ItemError> {
        self.require_tree("depth")?;
        if depth < 0 {
            return Err(ItemError::validation("depth", "must not be negative"));
        }
        self.depth = depth;
        Ok(())
    }

    pub fn is_subobject(&self) -> bool {
        self.is_subobject
    }

    pub fn set_is_subobject(&mut self, is_subobject: bool) -> Result<(), ItemError> {
        self.require_tree("is_subobject")?;
        self.is_subobject = is_subobject;
        *self.conceptual_parent.lock() = None;
        Ok(())
    }

    /// Names of the logical children, in insertion order
    pub fn children(&self) -> &[String] {
        if self.kind.has_children() {
            &self.children
        } else {
            &[]
        }
    }

    /// Children names, optionally sorted
    pub fn get_children(&self, sorted: bool) -> Vec<String> {
        let mut children = self.children().to_vec();
        if sorted {
            children.sort();
        }
        children
    }

    /// Replace the children list. Ignored with a warning on kinds without children.
    pub fn set_children(&mut self, children: Vec<String>) {
        if !self.kind.has_children() {
            warn!(
                kind = %self.kind,
                item = %self.name,
                "Ignoring children write on a kind without logical children"
            );
            return;
        }
        self.children = children;
    }

    /// Append one child name if not already present
    pub fn add_child(&mut self, name: &str) {
        if !self.kind.has_children() {
            warn!(kind = %self.kind, item = %self.name, child = name, "Ignoring child on a kind without logical children");
            return;
        }
        if !self.children.iter().any(|existing| existing == name) {
            self.children.push(name.to_string());
        }
    }

    pub fn remove_child(&mut self, name: &str) -> bool {
        let before = self.children.len();
        self.children.retain(|existing| existing != name);
        self.children.len() != before
    }

    /// The logical parent, if it exists in `lookup`
    pub fn parent<'a>(&self, lookup: &'a dyn ItemLookup) -> Option<&'a Item> {
        if self.parent.is_empty() {
            return None;
        }
        let kind = self.kind.parent_kind(self.is_subobject)?;
        let found = lookup.find_item_of_kind(kind, &self.parent);
        if found.is_none() {
            debug!(
                item = %self.name,
                parent = %self.parent,
                "Parent not found, treating item as a root"
            );
        }
        found
    }

    fn require_tree(&self, field: &str) -> Result<(), ItemError> {
        if self.kind.has_tree() {
            Ok(())
        } else {
            Err(self.unknown_attribute(field))
        }
    }
}
