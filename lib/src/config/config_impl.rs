// lib/src/config/config_impl.rs

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::config::config_defaults::DEFAULT_CONFIG_FILE;
use crate::config::config_structs::AppConfig;
use crate::engine::rules::{RuleEngine, RuleSet};
use crate::errors::{GraphError, GraphResult};

impl AppConfig {
    /// Loads configuration from `path`. Without a path, `clinical_graph.toml`
    /// in the working directory is used when present, defaults otherwise.
    /// An explicitly named file that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> GraphResult<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load_file(fallback)
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(AppConfig::default())
                }
            }
        }
    }

    pub fn load_file(path: &Path) -> GraphResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| GraphError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {} ({} rules)", path.display(), config.rules.len());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> GraphResult<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.rule_set()?;
        Ok(config)
    }

    /// The configured rules, validated.
    pub fn rule_set(&self) -> GraphResult<RuleSet> {
        RuleSet::new(self.rules.clone())
    }

    pub fn rule_engine(&self) -> GraphResult<RuleEngine> {
        Ok(RuleEngine::new(self.rule_set()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rules::{builtin_rules, Comparator, LOINC_SYSTEM};
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn empty_document_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bundles_dir, PathBuf::from("data/bundles"));
        assert_eq!(config.out_dir, PathBuf::from("out"));
        assert!(!config.parallel);
        assert_eq!(config.rules, builtin_rules());
    }

    #[test]
    fn rules_list_replaces_builtins() {
        let config = AppConfig::from_toml_str(
            r#"
            parallel = true

            [[rules]]
            name = "Hypoxemia"
            code = "59408-5"
            comparator = "<"
            threshold = 92.0
            finding = "Hypoxemia"

            [[rules]]
            name = "Fever"
            system = "http://loinc.org"
            code = "8310-5"
            comparator = "gt"
            threshold = 38.0
            finding = "Fever"
            "#,
        )
        .unwrap();

        assert!(config.parallel);
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[0].system, LOINC_SYSTEM);
        assert_eq!(config.rules[0].comparator, Comparator::Lt);
        assert_eq!(config.rules[1].comparator, Comparator::Gt);
        assert_eq!(config.rule_engine().unwrap().rules().len(), 2);
    }

    #[test]
    fn invalid_documents_are_configuration_errors() {
        assert!(matches!(
            AppConfig::from_toml_str("parallel = \"yes\""),
            Err(GraphError::ConfigurationError(_))
        ));
        assert!(matches!(
            AppConfig::from_toml_str("unknown_key = 1"),
            Err(GraphError::ConfigurationError(_))
        ));
        let empty_label = r#"
            [[rules]]
            name = "Broken"
            code = "8310-5"
            comparator = ">"
            threshold = 38.0
            finding = ""
        "#;
        assert!(matches!(
            AppConfig::from_toml_str(empty_label),
            Err(GraphError::ConfigurationError(_))
        ));
    }

    #[test]
    fn loads_named_file_and_rejects_missing_one() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "out_dir = \"results\"").unwrap();
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.out_dir, PathBuf::from("results"));

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            AppConfig::load(Some(&missing)),
            Err(GraphError::ReadError { .. })
        ));
    }

    #[test]
    fn demo_configuration_parses() {
        let config = AppConfig::from_toml_str(include_str!("../../../demos/clinical_graph.toml")).unwrap();
        assert!(config.parallel);
        let names: Vec<_> = config.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Fever", "Tachycardia", "Hypoxemia"]);
    }
}
