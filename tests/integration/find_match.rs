//! Query matching across a catalog

use lineage::{Criteria, ItemCatalog, ItemKind, Settings, Value};

use crate::integration::fixture;

fn criteria(pairs: &[(&str, Option<&str>)]) -> Criteria {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.map(str::to_string)))
        .collect()
}

fn matching_names(catalog: &ItemCatalog, criteria: &Criteria) -> Vec<String> {
    catalog
        .iter()
        .filter(|item| item.find_match(criteria, true).unwrap_or(false))
        .map(|item| item.name().to_string())
        .collect()
}

#[test]
fn test_wildcard_selects_across_kinds() {
    let catalog = fixture(Settings::defaults());
    let mut names = matching_names(&catalog, &criteria(&[("name", Some("web*"))]));
    names.sort();
    assert_eq!(names, vec!["web", "web-big", "web01"]);
}

#[test]
fn test_negated_wildcard() {
    let catalog = fixture(Settings::defaults());
    let names = matching_names(&catalog, &criteria(&[("name", Some("~web*"))]));
    assert_eq!(names, vec!["f40"]);
}

#[test]
fn test_every_criterion_must_match() {
    let mut catalog = fixture(Settings::defaults());
    catalog
        .get_mut(ItemKind::System, "web01")
        .unwrap()
        .set("hostname", Value::from("web01.example.org"))
        .unwrap();

    let system = catalog.get(ItemKind::System, "web01").unwrap();
    let both = criteria(&[("name", Some("web01")), ("hostname", Some("*.example.org"))]);
    assert!(system.find_match(&both, false).unwrap());

    let conflicting = criteria(&[("name", Some("web01")), ("hostname", Some("*.example.com"))]);
    assert!(!system.find_match(&conflicting, false).unwrap());
}

#[test]
fn test_parent_field_matches_by_name() {
    let catalog = fixture(Settings::defaults());
    let names = matching_names(&catalog, &criteria(&[("parent", Some("web"))]));
    assert_eq!(names, vec!["web-big"]);
}

#[test]
fn test_strict_mode_requires_key_presence() {
    let catalog = fixture(Settings::defaults());
    let distro = catalog.get(ItemKind::Distro, "f40").unwrap();
    let hostname = criteria(&[("hostname", None)]);
    assert!(!distro.find_match(&hostname, false).unwrap());
    assert!(distro.find_match(&hostname, true).unwrap());
}
