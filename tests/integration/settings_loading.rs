//! Layered settings loading

use lineage::{ConfigLoader, Item, ItemKind, ItemCatalog, Settings, Value};
use std::fs;
use tempfile::TempDir;

use crate::integration::with_settings_env;

#[test]
fn test_defaults_only() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let config = with_settings_env(&test_dir, &[], || ConfigLoader::load(workspace.path()).unwrap());

    assert_eq!(config.settings.get("default_virt_ram"), Some(&Value::Int(512)));
    config.validate().unwrap();
}

#[test]
fn test_layer_precedence() {
    let test_dir = TempDir::new().unwrap();
    let global_dir = test_dir.path().join("xdg").join("lineage");
    fs::create_dir_all(&global_dir).unwrap();
    fs::write(
        global_dir.join("settings.toml"),
        "default_virt_ram = 1024\ndefault_autoinstall = \"global.ks\"\nproxy_url_int = \"http://global:3128\"\n",
    )
    .unwrap();

    let workspace = TempDir::new().unwrap();
    let config_dir = workspace.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("settings.toml"),
        "default_virt_ram = 2048\ndefault_autoinstall = \"workspace.ks\"\n",
    )
    .unwrap();
    fs::write(config_dir.join("staging.toml"), "default_virt_ram = 4096\n").unwrap();

    let config = with_settings_env(
        &test_dir,
        &[
            ("LINEAGE_ENV", "staging"),
            ("LINEAGE_SETTINGS_DEFAULT_AUTOINSTALL", "env.ks"),
        ],
        || ConfigLoader::load(workspace.path()).unwrap(),
    );

    assert_eq!(config.settings.get("default_virt_ram"), Some(&Value::Int(4096)));
    assert_eq!(config.settings.get("default_autoinstall"), Some(&Value::from("env.ks")));
    assert_eq!(
        config.settings.get("proxy_url_int"),
        Some(&Value::from("http://global:3128"))
    );
}

#[test]
fn test_environment_lists() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let config = with_settings_env(
        &test_dir,
        &[("LINEAGE_SETTINGS_DEFAULT_OWNERSHIP", "ops,web")],
        || ConfigLoader::load(workspace.path()).unwrap(),
    );
    assert_eq!(
        config.settings.get("default_ownership"),
        Some(&Value::str_list(&["ops", "web"]))
    );
}

#[test]
fn test_loaded_settings_drive_resolution() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let config_dir = workspace.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("settings.toml"),
        "default_virt_disk_driver = \"qcow2\"\n\n[kernel_options]\nconsole = \"ttyS0\"\n",
    )
    .unwrap();

    let config = with_settings_env(&test_dir, &[], || ConfigLoader::load(workspace.path()).unwrap());
    let settings = config.settings.into_shared();

    let mut profile = Item::new(ItemKind::Profile, settings);
    profile.set_name("web").unwrap();
    let catalog = ItemCatalog::new();

    assert_eq!(
        profile.resolve_enum_token("virt_disk_driver", &catalog).unwrap(),
        "qcow2"
    );
    assert_eq!(
        profile.resolve_mapping("kernel_options", &catalog).unwrap()["console"],
        Value::from("ttyS0")
    );
}

#[test]
fn test_xdg_config_path_respects_env() {
    let test_dir = TempDir::new().unwrap();
    let path = with_settings_env(&test_dir, &[], ConfigLoader::xdg_config_path).unwrap();
    assert_eq!(path, test_dir.path().join("xdg").join("lineage").join("settings.toml"));
}

#[test]
fn test_settings_terminus_helper() {
    let settings = Settings::defaults();
    assert_eq!(settings.terminus("virt_disk_driver"), Some(&Value::from("raw")));
}
