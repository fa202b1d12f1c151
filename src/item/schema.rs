//! Per-kind property registry.
//!
//! Every settable field of every kind is declared here once, together with the
//! shape its values take and its initial state. Generic access (`set`, `get`,
//! `from_dict`, `to_raw_dict`, `find_match`) goes through the registry instead of
//! reflecting over struct fields.

use super::enums::{Arch, PowerType, VirtDiskDriver};
use super::kind::ItemKind;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use strum::VariantNames;

/// Identity and tree fields stored directly on the item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreField {
    Uid,
    Name,
    Comment,
    Ctime,
    Mtime,
    Parent,
    Depth,
    IsSubobject,
    Children,
}

/// Read-only values computed from other fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    RemoteGrubKernel,
    RemoteGrubInitrd,
}

impl Derivation {
    pub fn source_field(self) -> &'static str {
        match self {
            Derivation::RemoteGrubKernel => "remote_boot_kernel",
            Derivation::RemoteGrubInitrd => "remote_boot_initrd",
        }
    }
}

/// Value shape of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Text,
    Bool,
    Int,
    Float,
    Enum(&'static [&'static str]),
    Map { allow_multiples: bool },
    InheritText,
    InheritList,
    InheritBool,
    InheritInt,
    InheritFloat,
    InheritEnum(&'static [&'static str]),
    InheritMap { allow_multiples: bool },
    InheritYamlMap,
    Interfaces,
    Derived(Derivation),
}

impl Shape {
    /// Whether the property may hold the inherited state
    pub fn is_resolvable(self) -> bool {
        matches!(
            self,
            Shape::InheritText
                | Shape::InheritList
                | Shape::InheritBool
                | Shape::InheritInt
                | Shape::InheritFloat
                | Shape::InheritEnum(_)
                | Shape::InheritMap { .. }
                | Shape::InheritYamlMap
        )
    }

    pub fn is_mapping(self) -> bool {
        matches!(
            self,
            Shape::Map { .. } | Shape::InheritMap { .. } | Shape::InheritYamlMap
        )
    }

    pub fn members(self) -> Option<&'static [&'static str]> {
        match self {
            Shape::Enum(members) | Shape::InheritEnum(members) => Some(members),
            _ => None,
        }
    }
}

/// How a field is reached on the item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Core(CoreField),
    Property(Shape),
}

/// State a property starts in on a fresh item
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Initial {
    Inherit,
    Empty,
    Text(&'static str),
    Bool(bool),
    Int(i64),
    Member(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub access: Access,
    pub initial: Initial,
    /// Property name used for resolution, when it differs from the field name
    pub resolve_as: Option<&'static str>,
    /// Settings terminus, when it differs from the resolved property name
    pub settings_key: Option<&'static str>,
}

impl FieldSpec {
    const fn core(name: &'static str, field: CoreField) -> Self {
        Self {
            name,
            access: Access::Core(field),
            initial: Initial::Empty,
            resolve_as: None,
            settings_key: None,
        }
    }

    const fn property(name: &'static str, shape: Shape, initial: Initial) -> Self {
        Self {
            name,
            access: Access::Property(shape),
            initial,
            resolve_as: None,
            settings_key: None,
        }
    }

    const fn resolved_as(mut self, property: &'static str) -> Self {
        self.resolve_as = Some(property);
        self
    }

    const fn with_settings_key(mut self, key: &'static str) -> Self {
        self.settings_key = Some(key);
        self
    }

    /// The property name passed to `resolve_scalar`/`resolve_enum` for this field
    pub fn resolution_name(&self) -> &'static str {
        self.resolve_as.unwrap_or(self.name)
    }

    pub fn shape(&self) -> Option<Shape> {
        match self.access {
            Access::Property(shape) => Some(shape),
            Access::Core(_) => None,
        }
    }
}

/// Ordered field registry of one kind
#[derive(Debug)]
pub struct Schema {
    kind: ItemKind,
    fields: Vec<FieldSpec>,
    index: HashMap<&'static str, usize>,
}

impl Schema {
    fn build(kind: ItemKind, groups: &[&[FieldSpec]]) -> Self {
        let fields: Vec<FieldSpec> = groups.iter().flat_map(|group| group.iter().copied()).collect();
        let index = fields
            .iter()
            .enumerate()
            .map(|(position, spec)| (spec.name, position))
            .collect();
        Self { kind, fields, index }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&position| &self.fields[position])
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Field whose resolution name is `property`
    pub fn resolvable(&self, property: &str) -> Option<&FieldSpec> {
        self.field(property).or_else(|| {
            self.fields
                .iter()
                .find(|spec| spec.resolve_as == Some(property))
        })
    }
}

/// Attribute keys of one network interface record
pub const INTERFACE_FIELDS: &[&str] = &[
    "bonding_opts",
    "bridge_opts",
    "cnames",
    "connected_mode",
    "dhcp_tag",
    "dns_name",
    "if_gateway",
    "interface_master",
    "interface_type",
    "ip_address",
    "ipv6_address",
    "ipv6_default_gateway",
    "ipv6_mtu",
    "ipv6_prefix",
    "ipv6_secondaries",
    "ipv6_static_routes",
    "mac_address",
    "management",
    "mtu",
    "netmask",
    "static",
    "static_routes",
    "virt_bridge",
];

const IDENTITY: &[FieldSpec] = &[
    FieldSpec::core("uid", CoreField::Uid),
    FieldSpec::core("name", CoreField::Name),
    FieldSpec::core("comment", CoreField::Comment),
    FieldSpec::core("ctime", CoreField::Ctime),
    FieldSpec::core("mtime", CoreField::Mtime),
    FieldSpec::property("owners", Shape::InheritList, Initial::Inherit)
        .with_settings_key("default_ownership"),
];

const TREE: &[FieldSpec] = &[
    FieldSpec::core("parent", CoreField::Parent),
    FieldSpec::core("depth", CoreField::Depth),
    FieldSpec::core("is_subobject", CoreField::IsSubobject),
    FieldSpec::core("children", CoreField::Children),
];

const BOOTABLE: &[FieldSpec] = &[
    FieldSpec::property(
        "kernel_options",
        Shape::InheritMap { allow_multiples: true },
        Initial::Empty,
    ),
    FieldSpec::property(
        "kernel_options_post",
        Shape::InheritMap { allow_multiples: true },
        Initial::Empty,
    ),
    FieldSpec::property(
        "autoinstall_meta",
        Shape::InheritMap { allow_multiples: true },
        Initial::Empty,
    ),
    FieldSpec::property(
        "fetchable_files",
        Shape::InheritMap { allow_multiples: false },
        Initial::Empty,
    ),
    FieldSpec::property(
        "boot_files",
        Shape::InheritMap { allow_multiples: false },
        Initial::Empty,
    ),
    FieldSpec::property(
        "template_files",
        Shape::Map { allow_multiples: false },
        Initial::Empty,
    ),
    FieldSpec::property("mgmt_classes", Shape::InheritList, Initial::Empty),
    FieldSpec::property("mgmt_parameters", Shape::InheritYamlMap, Initial::Empty),
];

static DISTRO: Lazy<Schema> = Lazy::new(|| {
    let own = [
        FieldSpec::property("arch", Shape::Enum(Arch::VARIANTS), Initial::Member("x86_64")),
        FieldSpec::property("kernel", Shape::Text, Initial::Empty),
        FieldSpec::property("initrd", Shape::Text, Initial::Empty),
        FieldSpec::property("os_version", Shape::Text, Initial::Empty),
        FieldSpec::property("remote_boot_kernel", Shape::Text, Initial::Empty),
        FieldSpec::property("remote_boot_initrd", Shape::Text, Initial::Empty),
        FieldSpec::property(
            "remote_grub_kernel",
            Shape::Derived(Derivation::RemoteGrubKernel),
            Initial::Empty,
        ),
        FieldSpec::property(
            "remote_grub_initrd",
            Shape::Derived(Derivation::RemoteGrubInitrd),
            Initial::Empty,
        ),
    ];
    Schema::build(ItemKind::Distro, &[IDENTITY, TREE, BOOTABLE, &own])
});

static PROFILE: Lazy<Schema> = Lazy::new(|| {
    let own = [
        FieldSpec::property("autoinstall", Shape::InheritText, Initial::Inherit),
        FieldSpec::property("proxy", Shape::InheritText, Initial::Inherit)
            .resolved_as("proxy_url_int"),
        FieldSpec::property("enable_menu", Shape::InheritBool, Initial::Inherit),
        FieldSpec::property("virt_ram", Shape::InheritInt, Initial::Inherit),
        FieldSpec::property("virt_file_size", Shape::InheritFloat, Initial::Inherit),
        FieldSpec::property(
            "virt_disk_driver",
            Shape::InheritEnum(VirtDiskDriver::VARIANTS),
            Initial::Inherit,
        ),
    ];
    Schema::build(ItemKind::Profile, &[IDENTITY, TREE, BOOTABLE, &own])
});

static SYSTEM: Lazy<Schema> = Lazy::new(|| {
    let own = [
        FieldSpec::property("autoinstall", Shape::InheritText, Initial::Inherit),
        FieldSpec::property("proxy", Shape::InheritText, Initial::Inherit)
            .resolved_as("proxy_url_int"),
        FieldSpec::property(
            "virt_disk_driver",
            Shape::InheritEnum(VirtDiskDriver::VARIANTS),
            Initial::Inherit,
        ),
        FieldSpec::property("hostname", Shape::Text, Initial::Empty),
        FieldSpec::property("netboot_enabled", Shape::Bool, Initial::Bool(false)),
        FieldSpec::property(
            "power_type",
            Shape::InheritEnum(PowerType::VARIANTS),
            Initial::Inherit,
        )
        .with_settings_key("power_management_default_type"),
        FieldSpec::property("interfaces", Shape::Interfaces, Initial::Empty),
    ];
    Schema::build(ItemKind::System, &[IDENTITY, TREE, BOOTABLE, &own])
});

static TEMPLATE: Lazy<Schema> = Lazy::new(|| {
    let own = [
        FieldSpec::property("template_type", Shape::Text, Initial::Text("cheetah")),
        FieldSpec::property("template_uri", Shape::Text, Initial::Empty),
        FieldSpec::property("built_in", Shape::Bool, Initial::Bool(false)),
    ];
    Schema::build(ItemKind::Template, &[IDENTITY, &own])
});

pub fn schema_for(kind: ItemKind) -> &'static Schema {
    match kind {
        ItemKind::Distro => &DISTRO,
        ItemKind::Profile => &PROFILE,
        ItemKind::System => &SYSTEM,
        ItemKind::Template => &TEMPLATE,
    }
}
