//! Walks over the item tree: descendants, conceptual parent and the
//! resolution chain (`grab_tree`).
//!
//! Every walk tracks the uids it has visited and stops with
//! [`ItemError::Cycle`] as soon as a reference loops back.

use super::{ItemLookup, Visited};
use crate::config::Settings;
use crate::error::ItemError;
use crate::item::Item;
use std::collections::HashSet;
use tracing::debug;

/// One link of a resolution chain
#[derive(Debug, Clone, Copy)]
pub enum Layer<'a> {
    Item(&'a Item),
    Settings(&'a Settings),
}

impl<'a> Layer<'a> {
    pub fn as_item(&self) -> Option<&'a Item> {
        match *self {
            Layer::Item(item) => Some(item),
            Layer::Settings(_) => None,
        }
    }

    pub fn is_settings(&self) -> bool {
        matches!(self, Layer::Settings(_))
    }
}

impl Item {
    /// Every item below this one, depth first, each collected once
    pub fn descendants<'a>(&'a self, lookup: &'a dyn ItemLookup) -> Result<Vec<&'a Item>, ItemError> {
        let mut results = Vec::new();
        let mut path = vec![self.uid().to_string()];
        let mut collected = HashSet::new();
        self.collect_descendants(lookup, &mut path, &mut collected, &mut results)?;
        debug!(item = %self.name, count = results.len(), "Collected descendants");
        Ok(results)
    }

    fn collect_descendants<'a>(
        &self,
        lookup: &'a dyn ItemLookup,
        path: &mut Vec<String>,
        collected: &mut HashSet<String>,
        results: &mut Vec<&'a Item>,
    ) -> Result<(), ItemError> {
        for child_name in self.children() {
            let Some(child) = self.find_child(lookup, child_name) else {
                debug!(item = %self.name, child = %child_name, "Child not found, skipping");
                continue;
            };
            if path.iter().any(|uid| uid == child.uid()) {
                return Err(ItemError::Cycle {
                    item: child.name().to_string(),
                });
            }
            if !collected.insert(child.uid().to_string()) {
                continue;
            }
            results.push(child);
            path.push(child.uid().to_string());
            child.collect_descendants(lookup, path, collected, results)?;
            path.pop();
        }
        Ok(())
    }

    fn find_child<'a>(&self, lookup: &'a dyn ItemLookup, name: &str) -> Option<&'a Item> {
        self.kind
            .child_kinds()
            .iter()
            .find_map(|kind| lookup.find_item_of_kind(*kind, name))
    }

    /// Nearest ancestor whose kind differs from this item's kind
    pub fn conceptual_parent<'a>(
        &'a self,
        lookup: &'a dyn ItemLookup,
    ) -> Result<Option<&'a Item>, ItemError> {
        let mut visited = Visited::start(self);
        let mut candidate = self.parent(lookup);
        while let Some(ancestor) = candidate {
            visited.enter(ancestor)?;
            if ancestor.kind() != self.kind {
                *self.conceptual_parent.lock() = Some(ancestor.name().to_string());
                return Ok(Some(ancestor));
            }
            candidate = ancestor.parent(lookup);
        }
        *self.conceptual_parent.lock() = None;
        Ok(None)
    }

    /// Name of the conceptual parent found by the last `conceptual_parent` call
    pub fn cached_conceptual_parent(&self) -> Option<String> {
        self.conceptual_parent.lock().clone()
    }

    /// The resolution chain: this item, its ancestors nearest first, then the settings
    pub fn grab_tree<'a>(&'a self, lookup: &'a dyn ItemLookup) -> Result<Vec<Layer<'a>>, ItemError> {
        let mut visited = Visited::start(self);
        let mut layers = vec![Layer::Item(self)];
        let mut parent = self.parent(lookup);
        while let Some(ancestor) = parent {
            visited.enter(ancestor)?;
            layers.push(Layer::Item(ancestor));
            parent = ancestor.parent(lookup);
        }
        layers.push(Layer::Settings(self.settings.as_ref()));
        debug!(
            item = %self.name,
            layers = layers.len(),
            "grab_tree found {} layers (including settings)",
            layers.len()
        );
        Ok(layers)
    }
}
