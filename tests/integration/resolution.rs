//! Resolution across the whole item tree

use lineage::item::{PowerType, VirtDiskDriver};
use lineage::{ItemError, ItemKind, Mapping, Settings, Value, INHERIT_TOKEN};
use pretty_assertions::assert_eq;

use crate::integration::fixture;

#[test]
fn test_system_inherits_through_sub_profile() {
    let mut catalog = fixture(Settings::defaults());
    catalog
        .get_mut(ItemKind::Profile, "web")
        .unwrap()
        .set("autoinstall", Value::from("web.ks"))
        .unwrap();

    let system = catalog.get(ItemKind::System, "web01").unwrap();
    assert_eq!(
        system.resolve_scalar("autoinstall", &catalog).unwrap(),
        Value::from("web.ks")
    );
}

#[test]
fn test_nearest_own_value_wins() {
    let mut catalog = fixture(Settings::defaults());
    for (name, ram) in [("web", 1024i64), ("web-big", 8192)] {
        catalog
            .get_mut(ItemKind::Profile, name)
            .unwrap()
            .set("virt_ram", Value::Int(ram))
            .unwrap();
    }
    let sub = catalog.get(ItemKind::Profile, "web-big").unwrap();
    assert_eq!(sub.resolve_scalar("virt_ram", &catalog).unwrap(), Value::Int(8192));
    let profile = catalog.get(ItemKind::Profile, "web").unwrap();
    assert_eq!(profile.resolve_scalar("virt_ram", &catalog).unwrap(), Value::Int(1024));
}

#[test]
fn test_settings_terminus_for_unset_chain() {
    let catalog = fixture(Settings::defaults().with("default_virt_ram", 768i64));
    let sub = catalog.get(ItemKind::Profile, "web-big").unwrap();
    assert_eq!(sub.resolve_scalar("virt_ram", &catalog).unwrap(), Value::Int(768));
}

#[test]
fn test_inherited_sentinel_never_leaks() {
    let catalog = fixture(Settings::defaults());
    for item in catalog.iter() {
        let resolved = item.to_resolved_dict(&catalog).unwrap();
        for (key, value) in &resolved {
            assert_ne!(
                value,
                &Value::from(INHERIT_TOKEN),
                "{} {} resolved to the inherit token",
                item.name(),
                key
            );
        }
    }
}

#[test]
fn test_unresolvable_chain_errors() {
    let catalog = fixture(Settings::new());
    let system = catalog.get(ItemKind::System, "web01").unwrap();
    let err = system.to_resolved_dict(&catalog).unwrap_err();
    assert!(matches!(err, ItemError::UnresolvedInheritance { .. }));
}

#[test]
fn test_mapping_inherits_parent_values() {
    let mut catalog = fixture(Settings::defaults());
    catalog
        .get_mut(ItemKind::Profile, "web")
        .unwrap()
        .set("fetchable_files", Value::from("a=1 b=2"))
        .unwrap();
    let sub = catalog.get_mut(ItemKind::Profile, "web-big").unwrap();
    sub.set("fetchable_files", Value::from(INHERIT_TOKEN)).unwrap();

    let sub = catalog.get(ItemKind::Profile, "web-big").unwrap();
    let expected = Mapping::from([
        ("a".to_string(), Value::from("1")),
        ("b".to_string(), Value::from("2")),
    ]);
    assert_eq!(sub.resolve_mapping("fetchable_files", &catalog).unwrap(), expected);
}

#[test]
fn test_tombstone_removes_inherited_key() {
    let mut catalog = fixture(Settings::defaults());
    catalog
        .get_mut(ItemKind::Profile, "web")
        .unwrap()
        .set("fetchable_files", Value::from("a=1 b=2"))
        .unwrap();
    let mut overlay = Mapping::new();
    overlay.insert("b".to_string(), Value::from("~"));
    catalog
        .get_mut(ItemKind::Profile, "web-big")
        .unwrap()
        .set("fetchable_files", Value::Map(overlay))
        .unwrap();

    let sub = catalog.get(ItemKind::Profile, "web-big").unwrap();
    assert_eq!(
        sub.resolve_mapping("fetchable_files", &catalog).unwrap(),
        Mapping::from([("a".to_string(), Value::from("1"))])
    );
}

#[test]
fn test_enums_resolve_to_typed_values() {
    let mut catalog = fixture(Settings::defaults());
    catalog
        .get_mut(ItemKind::Profile, "web")
        .unwrap()
        .set("virt_disk_driver", Value::from("vmdk"))
        .unwrap();

    let system = catalog.get(ItemKind::System, "web01").unwrap();
    assert_eq!(
        system.resolve_enum::<VirtDiskDriver>("virt_disk_driver", &catalog).unwrap(),
        VirtDiskDriver::Vmdk
    );
    assert_eq!(
        system.resolve_enum::<PowerType>("power_type", &catalog).unwrap(),
        PowerType::Ipmilanplus
    );
}

#[test]
fn test_owners_default_to_settings_ownership() {
    let catalog = fixture(Settings::defaults());
    let system = catalog.get(ItemKind::System, "web01").unwrap();
    assert_eq!(system.owners(&catalog).unwrap(), vec!["admin".to_string()]);
}
