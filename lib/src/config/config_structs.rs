// lib/src/config/config_structs.rs

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::config_defaults::*;
use crate::engine::rules::Rule;

/// Run configuration. Every field has a default, so an empty file (or no
/// file at all) gives the built-in Fever and Tachycardia rules.
///
/// ```toml
/// bundles_dir = "data/bundles"
/// out_dir = "out"
/// parallel = true
///
/// [[rules]]
/// name = "Hypoxemia"
/// code = "59408-5"
/// comparator = "<"
/// threshold = 92
/// finding = "Hypoxemia"
/// ```
///
/// A `[[rules]]` list replaces the built-in rules rather than extending them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_bundles_dir")]
    pub bundles_dir: PathBuf,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    #[serde(default = "default_rules")]
    pub rules: Vec<Rule>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bundles_dir: default_bundles_dir(),
            out_dir: default_out_dir(),
            parallel: default_parallel(),
            rules: default_rules(),
        }
    }
}
