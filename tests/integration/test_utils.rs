//! Shared test utilities for integration tests
//!
//! Provides the standard item tree fixture and serialized access to the
//! process environment for settings-loading tests.

use lineage::{Item, ItemCatalog, ItemKind, Settings};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const CAPTURED_VARS: &[&str] = &["HOME", "XDG_CONFIG_HOME", "LINEAGE_ENV"];

/// Environment variable state to restore after test
struct EnvState {
    vars: Vec<(String, Option<String>)>,
}

impl EnvState {
    fn capture(extra: &[(&str, &str)]) -> Self {
        let vars = CAPTURED_VARS
            .iter()
            .copied()
            .chain(extra.iter().map(|(key, _)| *key))
            .map(|key| (key.to_string(), std::env::var(key).ok()))
            .collect();
        Self { vars }
    }

    fn restore(self) {
        for (key, value) in self.vars {
            match value {
                Some(orig) => std::env::set_var(&key, orig),
                None => std::env::remove_var(&key),
            }
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME inside `test_dir` and `vars` set,
/// restoring the original environment afterwards
pub fn with_settings_env<F, R>(test_dir: &TempDir, vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture(vars);

    let test_home = test_dir.path().join("home");
    let test_config_home = test_dir.path().join("xdg");
    std::fs::create_dir_all(&test_home).unwrap();
    std::fs::create_dir_all(&test_config_home).unwrap();

    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_config_home.to_str().unwrap());
    std::env::remove_var("LINEAGE_ENV");
    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let result = f();

    env_state.restore();

    result
}

pub fn named(kind: ItemKind, name: &str, parent: &str, settings: &Arc<Settings>) -> Item {
    let mut item = Item::new(kind, Arc::clone(settings));
    item.set_name(name).unwrap();
    if !parent.is_empty() {
        item.set_parent(parent).unwrap();
    }
    item
}

/// distro "f40" -> profile "web" -> sub-profile "web-big" -> system "web01"
pub fn fixture(settings: Settings) -> ItemCatalog {
    let settings = Arc::new(settings);

    let mut distro = named(ItemKind::Distro, "f40", "", &settings);
    distro.set_children(vec!["web".to_string()]);

    let mut profile = named(ItemKind::Profile, "web", "f40", &settings);
    profile.set_depth(1).unwrap();
    profile.set_children(vec!["web-big".to_string()]);

    let mut sub = named(ItemKind::Profile, "web-big", "web", &settings);
    sub.set_is_subobject(true).unwrap();
    sub.set_depth(2).unwrap();
    sub.set_children(vec!["web01".to_string()]);

    let mut system = named(ItemKind::System, "web01", "web-big", &settings);
    system.set_depth(3).unwrap();

    let mut catalog = ItemCatalog::new();
    for item in [distro, profile, sub, system] {
        catalog.insert(item);
    }
    catalog
}
