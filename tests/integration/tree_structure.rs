//! Tree navigation over a catalog

use lineage::{Item, ItemError, ItemKind, Layer, Settings};
use std::sync::Arc;

use crate::integration::{fixture, named};

#[test]
fn test_distro_descendants_cover_the_subtree() {
    let catalog = fixture(Settings::defaults());
    let distro = catalog.get(ItemKind::Distro, "f40").unwrap();
    let descendants = distro.descendants(&catalog).unwrap();
    assert_eq!(descendants.len(), 3);
    assert!(descendants.iter().all(|item| item.name() != "f40"));
}

#[test]
fn test_profile_descendants_include_systems() {
    let catalog = fixture(Settings::defaults());
    let profile = catalog.get(ItemKind::Profile, "web").unwrap();
    let kinds: Vec<_> = profile
        .descendants(&catalog)
        .unwrap()
        .into_iter()
        .map(Item::kind)
        .collect();
    assert_eq!(kinds, vec![ItemKind::Profile, ItemKind::System]);
}

#[test]
fn test_conceptual_parent_of_sub_profile_is_distro() {
    let catalog = fixture(Settings::defaults());
    let sub = catalog.get(ItemKind::Profile, "web-big").unwrap();
    let parent = sub.conceptual_parent(&catalog).unwrap().unwrap();
    assert_eq!(parent.kind(), ItemKind::Distro);
    assert_eq!(parent.name(), "f40");
}

#[test]
fn test_grab_tree_orders_nearest_first() {
    let catalog = fixture(Settings::defaults());
    let system = catalog.get(ItemKind::System, "web01").unwrap();
    let layers = system.grab_tree(&catalog).unwrap();

    let names: Vec<_> = layers
        .iter()
        .filter_map(Layer::as_item)
        .map(Item::name)
        .collect();
    assert_eq!(names, vec!["web01", "web-big", "web", "f40"]);
    assert!(matches!(layers.last(), Some(Layer::Settings(_))));
}

#[test]
fn test_cyclic_parents_fail_fast() {
    let settings = Arc::new(Settings::defaults());
    let mut catalog = fixture(Settings::defaults());
    let mut loop_a = named(ItemKind::Profile, "loop-a", "loop-b", &settings);
    loop_a.set_is_subobject(true).unwrap();
    let mut loop_b = named(ItemKind::Profile, "loop-b", "loop-a", &settings);
    loop_b.set_is_subobject(true).unwrap();
    catalog.insert(loop_a);
    catalog.insert(loop_b);

    let looped = catalog.get(ItemKind::Profile, "loop-a").unwrap();
    assert!(matches!(looped.grab_tree(&catalog), Err(ItemError::Cycle { .. })));
    assert!(matches!(looped.conceptual_parent(&catalog), Err(ItemError::Cycle { .. })));
    assert!(matches!(
        looped.resolve_scalar("virt_ram", &catalog),
        Err(ItemError::Cycle { .. })
    ));
}

#[test]
fn test_dangling_references_are_tolerated() {
    let settings = Arc::new(Settings::defaults());
    let mut catalog = fixture(Settings::defaults());
    let orphan = named(ItemKind::System, "orphan", "no-such-profile", &settings);
    catalog
        .get_mut(ItemKind::Profile, "web")
        .unwrap()
        .add_child("no-such-child");
    catalog.insert(orphan);

    let orphan = catalog.get(ItemKind::System, "orphan").unwrap();
    assert!(orphan.parent(&catalog).is_none());
    assert_eq!(orphan.grab_tree(&catalog).unwrap().len(), 2);

    let profile = catalog.get(ItemKind::Profile, "web").unwrap();
    assert_eq!(profile.descendants(&catalog).unwrap().len(), 2);
}
