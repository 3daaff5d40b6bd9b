use crate::config::Config;
use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Config file location: explicit flag, then `SHELFWATCH_CONFIG`, then `./shelfwatch.toml`.
///
/// The returned flag is true when the location was asked for explicitly.
pub fn config_file_path(explicit: Option<PathBuf>) -> (PathBuf, bool) {
    if let Some(path) = explicit {
        return (path, true);
    }
    match std::env::var("SHELFWATCH_CONFIG") {
        Ok(path) if !path.is_empty() => (PathBuf::from(path), true),
        _ => (PathBuf::from("shelfwatch.toml"), false),
    }
}

/// Every file a single command touches, resolved before any work starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub catalog: PathBuf,
    pub personal_yaml: PathBuf,
    /// True when `personal_yaml` was picked from the personal directory
    pub personal_yaml_inferred: bool,
    pub watch_export: Option<PathBuf>,
    pub statistics_output: Option<PathBuf>,
}

pub struct PathManager {
    catalog: PathBuf,
    personal_dir: PathBuf,
    statistics_output: PathBuf,
}

impl PathManager {
    pub fn new(config: &Config) -> Self {
        Self {
            catalog: config.catalog.clone(),
            personal_dir: config.personal_dir.clone(),
            statistics_output: config.statistics_output.clone(),
        }
    }

    pub fn with_catalog(mut self, catalog: Option<PathBuf>) -> Self {
        if let Some(catalog) = catalog {
            self.catalog = catalog;
        }
        self
    }

    pub fn with_personal_dir(mut self, personal_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = personal_dir {
            self.personal_dir = dir;
        }
        self
    }

    /// Paths for `check`: personal YAML (explicit or first in the personal dir) and catalog.
    pub fn for_check(&self, personal_yaml: Option<PathBuf>) -> Result<ResolvedPaths, ConfigError> {
        let personal_yaml_inferred = personal_yaml.is_none();
        let personal_yaml = self.resolve_personal_yaml(personal_yaml)?;
        Ok(ResolvedPaths {
            catalog: self.existing_catalog()?,
            personal_yaml,
            personal_yaml_inferred,
            watch_export: None,
            statistics_output: None,
        })
    }

    /// Paths for `update-movies`. `personal_yaml` is a file name inside the personal dir.
    pub fn for_update_movies(&self, personal_yaml: Option<String>) -> Result<ResolvedPaths, ConfigError> {
        self.existing_personal_dir()?;
        let personal_yaml_inferred = personal_yaml.is_none();
        let personal_yaml = match personal_yaml {
            Some(name) => {
                let path = self.personal_dir.join(name);
                require_file(&path, "Personal YAML file")?;
                path
            }
            None => first_with_extension(&self.personal_dir, "yaml")?,
        };
        let watch_export = first_with_extension(&self.personal_dir, "csv")?;
        Ok(ResolvedPaths {
            catalog: self.existing_catalog()?,
            personal_yaml,
            personal_yaml_inferred,
            watch_export: Some(watch_export),
            statistics_output: None,
        })
    }

    /// Paths for `statistics`; the output defaults to the configured diagram path.
    pub fn for_statistics(
        &self,
        personal_yaml: Option<PathBuf>,
        output: Option<PathBuf>,
    ) -> Result<ResolvedPaths, ConfigError> {
        let personal_yaml_inferred = personal_yaml.is_none();
        let personal_yaml = self.resolve_personal_yaml(personal_yaml)?;
        Ok(ResolvedPaths {
            catalog: self.existing_catalog()?,
            personal_yaml,
            personal_yaml_inferred,
            watch_export: None,
            statistics_output: Some(output.unwrap_or_else(|| self.statistics_output.clone())),
        })
    }

    fn resolve_personal_yaml(&self, explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        let path = match explicit {
            Some(path) => path,
            None => {
                self.existing_personal_dir()?;
                first_with_extension(&self.personal_dir, "yaml")?
            }
        };
        require_file(&path, "Personal YAML file")?;
        Ok(path)
    }

    fn existing_personal_dir(&self) -> Result<(), ConfigError> {
        if !self.personal_dir.is_dir() {
            return Err(ConfigError::NotFound {
                what: "Personal directory",
                path: self.personal_dir.clone(),
            });
        }
        Ok(())
    }

    fn existing_catalog(&self) -> Result<PathBuf, ConfigError> {
        require_file(&self.catalog, "Books file")?;
        Ok(self.catalog.clone())
    }
}

fn require_file(path: &Path, what: &'static str) -> Result<(), ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            what,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// First non-hidden file in `dir` with the given extension, by sorted file name.
fn first_with_extension(dir: &Path, extension: &'static str) -> Result<PathBuf, ConfigError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(extension))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| !n.starts_with('.'))
                .unwrap_or(false)
        })
        .collect();
    candidates.sort();

    let pattern = match extension {
        "csv" => "CSV",
        _ => "YAML",
    };
    let first = candidates.into_iter().next().ok_or_else(|| ConfigError::NoMatch {
        pattern,
        dir: dir.to_path_buf(),
    })?;
    tracing::debug!(path = %first.display(), "Resolved default file");
    Ok(first)
}
