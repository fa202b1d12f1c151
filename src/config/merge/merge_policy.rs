//! Merge rules: built-in defaults and override order.
//!
//! Every source added after the defaults overrides them key by key; tables are
//! merged recursively by the `config` crate.

use crate::value::{Mapping, Value};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, ValueKind};

/// Built-in settings: a terminus for every resolvable property of every kind
pub fn builtin_defaults() -> Mapping {
    let empty = || Value::Map(Mapping::new());
    Mapping::from([
        ("default_ownership".to_string(), Value::str_list(&["admin"])),
        ("default_autoinstall".to_string(), Value::from("default.ks")),
        ("proxy_url_int".to_string(), Value::from("")),
        ("proxy_url_ext".to_string(), Value::from("")),
        ("enable_menu".to_string(), Value::Bool(true)),
        ("default_virt_ram".to_string(), Value::Int(512)),
        ("default_virt_file_size".to_string(), Value::Float(5.0)),
        ("default_virt_disk_driver".to_string(), Value::from("raw")),
        (
            "power_management_default_type".to_string(),
            Value::from("ipmilanplus"),
        ),
        ("mgmt_classes".to_string(), Value::List(Vec::new())),
        ("kernel_options".to_string(), empty()),
        ("kernel_options_post".to_string(), empty()),
        ("autoinstall_meta".to_string(), empty()),
        ("fetchable_files".to_string(), empty()),
        ("boot_files".to_string(), empty()),
        ("template_files".to_string(), empty()),
        ("mgmt_parameters".to_string(), empty()),
    ])
}

/// Create a Config builder with the built-in defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let mut builder = Config::builder();
    for (key, value) in builtin_defaults() {
        builder = builder.set_default(key, to_config_value(value))?;
    }
    Ok(builder)
}

/// Convert a settings value into the `config` crate's value tree
pub(crate) fn to_config_value(value: Value) -> config::Value {
    let kind = match value {
        Value::Null => ValueKind::Nil,
        Value::Bool(flag) => ValueKind::Boolean(flag),
        Value::Int(number) => ValueKind::I64(number),
        Value::Float(number) => ValueKind::Float(number),
        Value::Str(text) => ValueKind::String(text),
        Value::List(items) => ValueKind::Array(items.into_iter().map(to_config_value).collect()),
        Value::Map(map) => ValueKind::Table(
            map.into_iter()
                .map(|(key, value)| (key, to_config_value(value)))
                .collect(),
        ),
    };
    config::Value::new(None, kind)
}
