//! Settings loading

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::Config;
use super::validation::validate_config;

/// Load settings from a file
pub fn load_config(path: &Path) -> Result<Config> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading settings");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config: Config = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    validate_config(&config)?;
    debug!(path = %path.display(), "settings loaded and validated");
    Ok(config)
}

/// Find a settings file in a directory or its parents
///
/// The first name from [`config_file_names`] found while walking up from
/// `start_dir` wins.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for settings file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.exists() {
                info!(path = %config_path.display(), "found settings file");
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no settings file found");
    None
}

/// Load settings or fall back to defaults when no file exists
///
/// A settings file that exists but is invalid is still an error.
pub fn load_config_or_default(dir: &Path) -> Result<(Config, Option<PathBuf>)> {
    match find_config(dir) {
        Some(path) => Ok((load_config(&path)?, Some(path))),
        None => {
            warn!(dir = %dir.display(), "no settings found, using defaults");
            Ok((Config::default(), None))
        }
    }
}

/// Resolve the changelog file named by the settings
///
/// Relative paths are taken relative to the settings file's directory, or to
/// `dir` when defaults are in use.
pub fn changelog_path(config: &Config, config_path: Option<&Path>, dir: &Path) -> PathBuf {
    let base = config_path.and_then(Path::parent).unwrap_or(dir);
    base.join(&config.changelog.file)
}
