//! Configuration loading and discovery for `wmark.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::WmarkConfig;
use crate::position::Position;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "wmark.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse wmark.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the watermark image
    pub watermark: Option<PathBuf>,
    /// Override padding
    pub padding: Option<u32>,
    /// Override anchor position
    pub position: Option<Position>,
    /// Descend into directories
    pub recursive: Option<bool>,
    /// Number of parallel jobs
    pub jobs: Option<usize>,
}

/// Find wmark.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for wmark.toml
/// 2. Check XDG_CONFIG_HOME/wmark/wmark.toml (or ~/.config/wmark/wmark.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find wmark.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("wmark").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find wmark.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a wmark.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
///
/// A relative `watermark.path` is resolved against the directory holding the
/// config file.
pub fn load_config(path: Option<&Path>) -> Result<WmarkConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(WmarkConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<WmarkConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: WmarkConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let (Some(root), Some(watermark)) = (path.parent(), config.watermark.path.as_ref()) {
        config.watermark.path = Some(resolve_path(root, watermark));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut WmarkConfig, overrides: &CliOverrides) {
    if let Some(ref watermark) = overrides.watermark {
        config.watermark.path = Some(watermark.clone());
    }

    if let Some(padding) = overrides.padding {
        config.watermark.padding = padding;
    }

    if let Some(position) = overrides.position {
        config.watermark.position = position;
    }

    if let Some(recursive) = overrides.recursive {
        config.mark.recursive = recursive;
    }

    if let Some(jobs) = overrides.jobs {
        config.mark.jobs = jobs;
    }
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
