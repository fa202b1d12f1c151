//! Name lookup across every item collection.

use crate::item::{Item, ItemKind};
use std::collections::BTreeMap;

/// Finds items by name for tree navigation
pub trait ItemLookup {
    /// Any item with this name, whatever its kind
    fn find_item_by_name(&self, name: &str) -> Option<&Item>;

    /// An item of a specific kind with this name
    fn find_item_of_kind(&self, kind: ItemKind, name: &str) -> Option<&Item> {
        self.find_item_by_name(name)
            .filter(|item| item.kind() == kind)
    }
}

/// In-memory item collections, one per kind
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: BTreeMap<ItemKind, BTreeMap<String, Item>>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an item, returning the one it replaced
    pub fn insert(&mut self, item: Item) -> Option<Item> {
        self.items
            .entry(item.kind())
            .or_default()
            .insert(item.name().to_string(), item)
    }

    pub fn get(&self, kind: ItemKind, name: &str) -> Option<&Item> {
        self.items.get(&kind).and_then(|items| items.get(name))
    }

    pub fn get_mut(&mut self, kind: ItemKind, name: &str) -> Option<&mut Item> {
        self.items.get_mut(&kind).and_then(|items| items.get_mut(name))
    }

    pub fn remove(&mut self, kind: ItemKind, name: &str) -> Option<Item> {
        self.items.get_mut(&kind).and_then(|items| items.remove(name))
    }

    /// Items of one kind in name order
    pub fn of_kind(&self, kind: ItemKind) -> impl Iterator<Item = &Item> {
        self.items.get(&kind).into_iter().flat_map(|items| items.values())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values().flat_map(|items| items.values())
    }

    pub fn len(&self) -> usize {
        self.items.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ItemLookup for ItemCatalog {
    fn find_item_by_name(&self, name: &str) -> Option<&Item> {
        ItemKind::ALL
            .iter()
            .find_map(|kind| self.get(*kind, name))
    }

    fn find_item_of_kind(&self, kind: ItemKind, name: &str) -> Option<&Item> {
        self.get(kind, name)
    }
}
