//! Concrete item kinds and their structural rules.

use super::schema::{self, Schema};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The concrete kind of an item
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Distro,
    Profile,
    System,
    Template,
}

impl ItemKind {
    /// Every kind, in the order name lookups search them
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Distro,
        ItemKind::Profile,
        ItemKind::System,
        ItemKind::Template,
    ];

    pub fn type_name(self) -> &'static str {
        match self {
            ItemKind::Distro => "distro",
            ItemKind::Profile => "profile",
            ItemKind::System => "system",
            ItemKind::Template => "template",
        }
    }

    /// Whether the kind carries parent/depth/children fields at all
    pub fn has_tree(self) -> bool {
        !matches!(self, ItemKind::Template)
    }

    /// Whether the kind keeps a list of logical children
    pub fn has_children(self) -> bool {
        matches!(self, ItemKind::Distro | ItemKind::Profile)
    }

    /// Kind of the logical parent. Sub-profiles hang off profiles.
    pub fn parent_kind(self, is_subobject: bool) -> Option<ItemKind> {
        match self {
            ItemKind::Profile if is_subobject => Some(ItemKind::Profile),
            ItemKind::Profile => Some(ItemKind::Distro),
            ItemKind::System => Some(ItemKind::Profile),
            ItemKind::Distro | ItemKind::Template => None,
        }
    }

    /// Kinds a child name may refer to
    pub fn child_kinds(self) -> &'static [ItemKind] {
        match self {
            ItemKind::Distro => &[ItemKind::Profile],
            ItemKind::Profile => &[ItemKind::Profile, ItemKind::System],
            ItemKind::System | ItemKind::Template => &[],
        }
    }

    /// Fields `validate` insists on beyond the name
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            ItemKind::Distro => &["kernel"],
            ItemKind::Profile | ItemKind::System => &["parent"],
            ItemKind::Template => &["template_uri"],
        }
    }

    pub fn schema(self) -> &'static Schema {
        schema::schema_for(self)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
