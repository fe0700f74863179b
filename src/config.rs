// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{Result, StripError};
use crate::strip::RemovalRange;
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

const MAIN_VIEW_CONTROLLER: &str = "src/main/java/com/tpsstudio/view/MainViewController.java";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub passes: Vec<PassConfig>,
    #[serde(default)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// One hardcoded strip: a file and the half-open line range to drop from it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PassConfig {
    pub name: String,
    pub path: PathBuf,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JournalConfig {
    pub enabled: bool,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub backup: bool,
    pub backup_suffix: String,
}

impl PassConfig {
    pub fn range(&self) -> RemovalRange {
        RemovalRange::new(self.start, self.end)
    }

    /// Target path with Windows separators normalized.
    pub fn target(&self) -> PathBuf {
        PathBuf::from(Validator::sanitize_file_path(&self.path.to_string_lossy()))
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from(".range_strip/journal.json"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            backup: false,
            backup_suffix: ".orig".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("RANGE_STRIP")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| StripError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| StripError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            passes: vec![
                PassConfig {
                    name: "edit-export-panels".to_string(),
                    path: PathBuf::from(MAIN_VIEW_CONTROLLER),
                    start: 172,
                    end: 374,
                    description: Some(
                        "orphaned buildEditPanels and buildExportPanels bodies".to_string(),
                    ),
                },
                PassConfig {
                    name: "mode-methods".to_string(),
                    path: PathBuf::from(MAIN_VIEW_CONTROLLER),
                    start: 266,
                    end: 632,
                    description: Some("orphaned mode methods".to_string()),
                },
            ],
            journal: JournalConfig::default(),
            output: OutputConfig::default(),
        }
    }

    pub fn find_pass(&self, name: &str) -> Option<&PassConfig> {
        self.passes.iter().find(|pass| pass.name == name)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for pass in &self.passes {
            Validator::validate_pass_name(&pass.name)
                .map_err(|e| StripError::Config(e.to_string()))?;

            if !seen.insert(pass.name.as_str()) {
                return Err(StripError::Config(format!(
                    "duplicate pass name: {}",
                    pass.name
                )));
            }
        }

        if self.output.backup_suffix.is_empty() {
            return Err(StripError::Config(
                "backup_suffix must not be empty".to_string(),
            ));
        }

        if self.journal.enabled && self.journal.path.as_os_str().is_empty() {
            return Err(StripError::Config(
                "journal.path must be set when the journal is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("strip.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.passes.len(), 2);
        assert_eq!(
            config.find_pass("mode-methods").unwrap().range(),
            RemovalRange::new(266, 632)
        );
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
[[passes]]
name = "cleanup"
path = 'src\main\java\App.java'
start = 10
end = 20

[journal]
enabled = false
path = "journal.json"

[output]
backup = true
backup_suffix = ".bak"
"#,
        );

        let config = Config::load(Some(&path)).unwrap();
        let pass = config.find_pass("cleanup").unwrap();

        assert_eq!(pass.range(), RemovalRange::new(10, 20));
        assert_eq!(pass.target(), PathBuf::from("src/main/java/App.java"));
        assert_eq!(pass.description, None);
        assert!(!config.journal.enabled);
        assert!(config.output.backup);
        assert_eq!(config.output.backup_suffix, ".bak");
    }

    #[test]
    fn test_sections_fall_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
[[passes]]
name = "only"
path = "A.java"
start = 0
end = 1
"#,
        );

        let config = Config::load(Some(&path)).unwrap();
        assert!(config.journal.enabled);
        assert_eq!(config.output.backup_suffix, ".orig");
    }

    #[test]
    fn test_partial_section_keeps_field_defaults() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
[output]
backup = true
"#,
        );

        let config = Config::load(Some(&path)).unwrap();
        assert!(config.output.backup);
        assert_eq!(config.output.backup_suffix, ".orig");
    }

    #[test]
    fn test_duplicate_pass_names_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
[[passes]]
name = "twice"
path = "A.java"
start = 0
end = 1

[[passes]]
name = "twice"
path = "B.java"
start = 2
end = 3
"#,
        );

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("duplicate pass name"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
[journal]
enabled = true
path = "from-file.json"
"#,
        );

        // No other test asserts on journal.path.
        unsafe { std::env::set_var("RANGE_STRIP__JOURNAL__PATH", "from-env.json") };
        let loaded = Config::load(Some(&path));
        unsafe { std::env::remove_var("RANGE_STRIP__JOURNAL__PATH") };

        let config = loaded.unwrap();
        assert_eq!(config.journal.path, PathBuf::from("from-env.json"));
        assert!(config.journal.enabled);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let err = Config::load(Some(&temp.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, StripError::Config(_)));
    }
}
