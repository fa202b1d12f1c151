//! Flat dict conversion through the public API

use lineage::serialize::strip_legacy_keys;
use lineage::{Item, ItemError, ItemKind, Mapping, Settings, Value, INHERIT_TOKEN};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn settings() -> Arc<Settings> {
    Arc::new(Settings::defaults())
}

#[test]
fn test_system_from_json_document() {
    let document = lineage::value::mapping_from_json(json!({
        "name": "db01",
        "parent": "db",
        "Hostname": "db01.example.org",
        "netboot_enabled": "yes",
        "kernel_options": "console=ttyS0,115200n8 quiet",
        "power_type": "REDFISH",
        "interfaces": {
            "eth0": {"mac_address": "aa:bb:cc:dd:ee:01", "ip_address": "10.0.0.9"}
        },
    }));

    let mut system = Item::new(ItemKind::System, settings());
    system.from_dict(&document).unwrap();

    let raw = system.to_raw_dict();
    assert_eq!(raw["hostname"], Value::from("db01.example.org"));
    assert_eq!(raw["netboot_enabled"], Value::Bool(true));
    assert_eq!(raw["power_type"], Value::from("redfish"));
    assert_eq!(
        raw["kernel_options"],
        Value::Map(Mapping::from([
            ("console".to_string(), Value::from("ttyS0,115200n8")),
            ("quiet".to_string(), Value::Null),
        ]))
    );
    assert_eq!(raw["virt_disk_driver"], Value::from(INHERIT_TOKEN));
}

#[test]
fn test_persisted_form_round_trips() {
    let mut distro = Item::new(ItemKind::Distro, settings());
    distro.set_name("f40").unwrap();
    distro.set("kernel", Value::from("/srv/f40/vmlinuz")).unwrap();
    distro.set("arch", Value::from("AARCH64")).unwrap();
    distro.set("remote_boot_kernel", Value::from("http://boot/f40/vmlinuz")).unwrap();
    distro.set("boot_files", Value::from("$img/a=/srv/a")).unwrap();
    distro.set_children(vec!["web".to_string()]);
    distro.touch();

    let persisted = distro.serialize();
    let mut restored = Item::new(ItemKind::Distro, settings());
    restored.deserialize(&persisted).unwrap();

    assert_eq!(restored, distro);
    assert_eq!(restored.to_raw_dict(), distro.to_raw_dict());
    assert_eq!(
        restored.get("remote_grub_kernel").unwrap(),
        Value::from("(http,boot)/f40/vmlinuz")
    );
}

#[test]
fn test_raw_dict_feeds_back_after_stripping_aliases() {
    let mut profile = Item::new(ItemKind::Profile, settings());
    profile.set_name("web").unwrap();
    profile.set("autoinstall", Value::from("web.ks")).unwrap();

    let mut raw = profile.to_raw_dict();
    assert_eq!(raw["kickstart"], Value::from("web.ks"));
    strip_legacy_keys(&mut raw);

    let mut copy = Item::new(ItemKind::Profile, settings());
    copy.from_dict(&raw).unwrap();
    assert_eq!(copy.get("autoinstall").unwrap(), Value::from("web.ks"));
}

#[test]
fn test_unknown_keys_are_all_reported() {
    let mut template = Item::new(ItemKind::Template, settings());
    let document = lineage::value::mapping_from_json(json!({
        "name": "default.ks",
        "kernel": "x",
        "children": ["y"],
    }));
    match template.from_dict(&document) {
        Err(ItemError::UnknownFields(mut keys)) => {
            keys.sort();
            assert_eq!(keys, vec!["children".to_string(), "kernel".to_string()]);
        }
        other => panic!("expected UnknownFields, got {:?}", other),
    }
    assert_eq!(template.name(), "default.ks");
}
