//! Properties of the resolution chain

use lineage::inherit::merge_layers;
use lineage::{Item, ItemCatalog, ItemKind, Mapping, Overlay, Settings, Value, INHERIT_TOKEN};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

fn chain(settings: Settings) -> (ItemCatalog, Item) {
    let settings = Arc::new(settings);
    let mut distro = Item::new(ItemKind::Distro, Arc::clone(&settings));
    distro.set_name("f40").unwrap();
    let mut profile = Item::new(ItemKind::Profile, Arc::clone(&settings));
    profile.set_name("web").unwrap();
    profile.set_parent("f40").unwrap();
    let mut system = Item::new(ItemKind::System, settings);
    system.set_name("web01").unwrap();
    system.set_parent("web").unwrap();

    let mut catalog = ItemCatalog::new();
    catalog.insert(distro);
    catalog.insert(profile);
    (catalog, system)
}

proptest! {
    #[test]
    fn prop_own_value_beats_parent_and_settings(
        own in "[a-z]{1,12}\\.ks",
        parent in "[a-z]{1,12}\\.ks",
        fallback in "[a-z]{1,12}\\.ks",
    ) {
        let (mut catalog, mut system) = chain(Settings::defaults().with("default_autoinstall", fallback.as_str()));
        catalog
            .get_mut(ItemKind::Profile, "web")
            .unwrap()
            .set("autoinstall", Value::from(parent.as_str()))
            .unwrap();
        system.set("autoinstall", Value::from(own.as_str())).unwrap();

        prop_assert_eq!(
            system.resolve_scalar("autoinstall", &catalog).unwrap(),
            Value::from(own.as_str())
        );
    }

    #[test]
    fn prop_resolved_dict_never_holds_the_sentinel(
        ram in 1i64..65536,
        size in 0.5f64..500.0,
        menu in any::<bool>(),
    ) {
        let settings = Settings::defaults()
            .with("default_virt_ram", ram)
            .with("default_virt_file_size", size)
            .with("enable_menu", menu);
        let (catalog, system) = chain(settings);

        let inherit = Value::from(INHERIT_TOKEN);
        for item in catalog.iter().chain(std::iter::once(&system)) {
            let resolved = item.to_resolved_dict(&catalog).unwrap();
            prop_assert!(resolved.values().all(|value| value != &inherit));
        }
        let profile = catalog.get(ItemKind::Profile, "web").unwrap();
        prop_assert_eq!(profile.resolve_scalar("virt_ram", &catalog).unwrap(), Value::Int(ram));
    }

    #[test]
    fn prop_tombstones_annihilate_exactly_their_keys(
        fallback in prop::collection::btree_map("[a-f]{1,3}", any::<i64>(), 0..10),
        removed in prop::collection::btree_set("[a-f]{1,3}", 0..6),
    ) {
        let mut overlay = Overlay::new();
        for key in &removed {
            overlay.remove_key(key.as_str());
        }
        let flat: Mapping = fallback
            .iter()
            .map(|(key, value)| (key.clone(), Value::Int(*value)))
            .collect();

        let merged = merge_layers(flat, Some(&overlay));
        let expected: BTreeMap<String, Value> = fallback
            .into_iter()
            .filter(|(key, _)| !removed.contains(key))
            .map(|(key, value)| (key, Value::Int(value)))
            .collect();
        prop_assert_eq!(merged, expected);
    }

    #[test]
    fn prop_child_overlay_keys_override_parent(
        parent_keys in prop::collection::btree_set("[a-z]{1,4}", 1..6),
        child_keys in prop::collection::btree_set("[a-z]{1,4}", 1..6),
    ) {
        let (mut catalog, mut system) = chain(Settings::defaults());
        let parent_input: Mapping = parent_keys
            .iter()
            .map(|key| (key.clone(), Value::from("parent")))
            .collect();
        catalog
            .get_mut(ItemKind::Profile, "web")
            .unwrap()
            .set("boot_files", Value::Map(parent_input))
            .unwrap();
        let child_input: Mapping = child_keys
            .iter()
            .map(|key| (key.clone(), Value::from("child")))
            .collect();
        system.set("boot_files", Value::Map(child_input)).unwrap();

        let resolved = system.resolve_mapping("boot_files", &catalog).unwrap();
        let all_keys: BTreeSet<&String> = parent_keys.iter().chain(child_keys.iter()).collect();
        prop_assert_eq!(resolved.len(), all_keys.len());
        for key in &child_keys {
            prop_assert_eq!(&resolved[key], &Value::from("child"));
        }
    }
}
