//! Merge rules for the settings layers.

pub mod merge_policy;
