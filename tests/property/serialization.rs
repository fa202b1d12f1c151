//! Persisted form round trips for generated items

use lineage::{Item, ItemKind, Settings, Value, INHERIT_TOKEN};
use proptest::prelude::*;
use std::sync::Arc;

fn driver_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(INHERIT_TOKEN.to_string()),
        Just("raw".to_string()),
        Just("QCOW2".to_string()),
        Just("vmdk".to_string()),
    ]
}

/// Round trips a profile through `serialize` and `deserialize`
#[test]
fn test_profile_round_trip_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                "[a-z][a-z0-9_.-]{0,15}",
                ".{0,40}",
                prop::option::of(0i64..1_000_000),
                driver_token(),
                prop::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{1,6}", 0..5),
                0.0f64..2_000_000_000.0,
            ),
            |(name, comment, ram, driver, options, ctime)| {
                let settings = Arc::new(Settings::defaults());
                let mut original = Item::new(ItemKind::Profile, Arc::clone(&settings));
                original.set_name(&name).unwrap();
                original.set_comment(comment);
                if let Some(ram) = ram {
                    original.set("virt_ram", Value::Int(ram)).unwrap();
                }
                original.set("virt_disk_driver", Value::from(driver)).unwrap();
                let options: lineage::Mapping = options
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect();
                original.set("kernel_options", Value::Map(options)).unwrap();
                original.set_created_at(ctime).unwrap();

                let persisted = original.serialize();
                let mut restored = Item::new(ItemKind::Profile, settings);
                restored.deserialize(&persisted).unwrap();

                assert_eq!(restored.uid(), original.uid());
                assert_eq!(restored.serialize(), persisted);
                Ok(())
            },
        )
        .unwrap();
}
