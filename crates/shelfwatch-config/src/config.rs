use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Shared book/adaptation catalog
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
    /// Directory holding the personal YAML file and the watch-history CSV
    #[serde(default = "default_personal_dir")]
    pub personal_dir: PathBuf,
    /// Where `statistics` writes its Mermaid diagram
    #[serde(default = "default_statistics_output")]
    pub statistics_output: PathBuf,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Force JSON (true) or plain (false) log lines; unset = decide from the terminal
    #[serde(default)]
    pub json: Option<bool>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_catalog() -> PathBuf {
    PathBuf::from("reading-challenge.yaml")
}

fn default_personal_dir() -> PathBuf {
    PathBuf::from("personal")
}

fn default_statistics_output() -> PathBuf {
    PathBuf::from("personal/statistics.mmd")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            personal_dir: default_personal_dir(),
            statistics_output: default_statistics_output(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: None,
            file: None,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config file if present.
    ///
    /// An explicitly requested file must exist; the implicit default path
    /// silently falls back to built-in defaults.
    pub fn load(path: &Path, explicit: bool) -> Result<Self, ConfigError> {
        if path.exists() {
            tracing::debug!(path = %path.display(), "Loading config file");
            return Self::load_from_file(path);
        }
        if explicit {
            return Err(ConfigError::NotFound {
                what: "Config file",
                path: path.to_path_buf(),
            });
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "catalog = \"books.yaml\"").unwrap();
        writeln!(file, "[logging]").unwrap();
        writeln!(file, "level = \"debug\"").unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.catalog, PathBuf::from("books.yaml"));
        assert_eq!(config.personal_dir, PathBuf::from("personal"));
        assert_eq!(config.statistics_output, PathBuf::from("personal/statistics.mmd"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.json, None);
    }

    #[test]
    fn test_config_missing_default_path_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("shelfwatch.toml"), false).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(&dir.path().join("custom.toml"), true);
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_config_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "catalog = [1, 2").unwrap();

        let result = Config::load_from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
