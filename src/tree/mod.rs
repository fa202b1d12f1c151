//! Item Tree
//!
//! Items reference their logical parent and children by name. The tree is
//! navigated through an [`ItemLookup`] supplied by the caller, so an item never
//! owns or caches other items; only names are stored.

pub mod links;
pub mod lookup;
pub mod walker;

pub use lookup::{ItemCatalog, ItemLookup};
pub use walker::Layer;

use crate::error::ItemError;
use crate::item::Item;
use std::collections::HashSet;

/// Uids already seen by a walk
#[derive(Debug, Default)]
pub struct Visited {
    seen: HashSet<String>,
}

impl Visited {
    /// A walk that begins at `origin`
    pub fn start(origin: &Item) -> Self {
        let mut visited = Self::default();
        visited.seen.insert(origin.uid().to_string());
        visited
    }

    /// Record `item`; fails when the walk reaches it a second time
    pub fn enter(&mut self, item: &Item) -> Result<(), ItemError> {
        if self.seen.insert(item.uid().to_string()) {
            Ok(())
        } else {
            Err(ItemError::Cycle {
                item: item.name().to_string(),
            })
        }
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.seen.contains(item.uid())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
