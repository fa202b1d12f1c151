//! Enumerated property values.

use crate::error::ItemError;
use std::str::FromStr;
use strum::{EnumString, IntoStaticStr, VariantNames};

/// An enum that can be read from a plain settings or input token
pub trait ConvertibleEnum: Copy + FromStr + Into<&'static str> + VariantNames {
    /// Coerce a token (case-insensitive) into a member of this enum
    fn to_enum(field: &str, token: &str) -> Result<Self, ItemError> {
        Self::from_str(token.trim()).map_err(|_| {
            ItemError::validation(
                field,
                format!(
                    "'{}' is not one of {}",
                    token,
                    Self::VARIANTS.join(", ")
                ),
            )
        })
    }

    fn token(self) -> &'static str {
        self.into()
    }
}

impl<T> ConvertibleEnum for T where T: Copy + FromStr + Into<&'static str> + VariantNames {}

/// Find the canonical member spelling for `token` among `members`
pub fn member_for(field: &str, members: &'static [&'static str], token: &str) -> Result<&'static str, ItemError> {
    let token = token.trim();
    members
        .iter()
        .copied()
        .find(|member| member.eq_ignore_ascii_case(token))
        .ok_or_else(|| {
            ItemError::validation(
                field,
                format!("'{}' is not one of {}", token, members.join(", ")),
            )
        })
}

/// CPU architecture of a distro
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, VariantNames)]
#[strum(ascii_case_insensitive)]
pub enum Arch {
    #[strum(serialize = "i386")]
    I386,
    #[strum(serialize = "x86_64")]
    X8664,
    #[strum(serialize = "ppc64le")]
    Ppc64le,
    #[strum(serialize = "aarch64")]
    Aarch64,
    #[strum(serialize = "s390x")]
    S390x,
}

/// Disk image driver for virtual guests
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, VariantNames)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VirtDiskDriver {
    Raw,
    Qcow2,
    Qed,
    Vdi,
    Vmdk,
}

/// Power management fence agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, VariantNames)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PowerType {
    Ipmilan,
    Ipmilanplus,
    Redfish,
    Apc,
    Virsh,
}
