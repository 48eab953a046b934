// lib/src/config/config_defaults.rs

use std::path::PathBuf;

use crate::engine::rules::{builtin_rules, Rule};

pub const DEFAULT_BUNDLES_DIRECTORY: &str = "data/bundles";
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "out";
pub const DEFAULT_CONFIG_FILE: &str = "clinical_graph.toml";

pub fn default_bundles_dir() -> PathBuf {
    PathBuf::from(DEFAULT_BUNDLES_DIRECTORY)
}

pub fn default_out_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIRECTORY)
}

pub fn default_parallel() -> bool {
    false
}

pub fn default_rules() -> Vec<Rule> {
    builtin_rules()
}
