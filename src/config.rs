//! # Configuration Module
//!
//! This module provides configuration support for incguard, letting a
//! project record which directories hold its headers and how to match them.
//!
//! Configuration can be specified in a `.incguard.toml` file or via the
//! `INCGUARD_CONFIG` environment variable.
//!
//! ```toml
//! directories = ["kernel", "user"]
//! pattern = "*.h"
//! exclude = ["**/generated/*.h"]
//! force = false
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".incguard.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "INCGUARD_CONFIG";

/// Directories scanned when neither the command line nor a config file names
/// any.
pub const DEFAULT_DIRECTORIES: [&str; 2] = ["kernel", "user"];

/// Main configuration struct for incguard.
///
/// Every field is optional; command-line arguments take precedence and
/// built-in defaults fill whatever is left.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
  /// Directories whose headers are guarded, in processing order.
  #[serde(default)]
  pub directories: Option<Vec<PathBuf>>,

  /// Filename pattern matched inside each directory.
  #[serde(default)]
  pub pattern: Option<String>,

  /// Glob patterns for paths to leave out.
  #[serde(default)]
  pub exclude: Vec<String>,

  /// Wrap headers even if they already carry a guard.
  #[serde(default)]
  pub force: bool,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A value in the config file is unusable.
  #[error("Invalid value for '{key}': {message}")]
  Invalid { key: &'static str, message: String },
}

impl Config {
  /// Load configuration from a file.
  ///
  /// # Arguments
  ///
  /// * `path` - Path to the configuration file
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    Ok(config)
  }

  /// Validate the configuration.
  ///
  /// Checks that:
  /// - `pattern`, when given, is non-empty
  /// - `directories`, when given, is non-empty and has no empty entries
  /// - `exclude` has no empty entries
  fn validate(&self) -> Result<(), ConfigError> {
    if let Some(ref pattern) = self.pattern
      && pattern.trim().is_empty()
    {
      return Err(ConfigError::Invalid {
        key: "pattern",
        message: "pattern cannot be empty".to_string(),
      });
    }

    if let Some(ref dirs) = self.directories {
      if dirs.is_empty() {
        return Err(ConfigError::Invalid {
          key: "directories",
          message: "at least one directory is required".to_string(),
        });
      }
      if dirs.iter().any(|d| d.as_os_str().is_empty()) {
        return Err(ConfigError::Invalid {
          key: "directories",
          message: "directory entries cannot be empty".to_string(),
        });
      }
    }

    if self.exclude.iter().any(|p| p.trim().is_empty()) {
      return Err(ConfigError::Invalid {
        key: "exclude",
        message: "exclude patterns cannot be empty".to_string(),
      });
    }

    Ok(())
  }
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `INCGUARD_CONFIG` environment variable
/// 3. `.incguard.toml` in `base_dir`
pub fn discover_config_path(explicit_path: Option<&Path>, base_dir: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    verbose_log!("Using explicit config path: {}", path.display());
    return Some(path.to_path_buf());
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let local_config = base_dir.join(DEFAULT_CONFIG_FILENAME);
  if local_config.exists() {
    verbose_log!("Using config: {}", local_config.display());
    return Some(local_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path.
///
/// An explicit `--config` path that cannot be read is an error; a missing
/// default config file is not.
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path from CLI flag
/// * `base_dir` - Directory searched for `.incguard.toml`
/// * `no_config` - If true, skip config file discovery
pub fn load_config(explicit_path: Option<&Path>, base_dir: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(None);
  }

  match discover_config_path(explicit_path, base_dir) {
    Some(path) => {
      let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}

/// Settings for one run after merging CLI, config, and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  pub directories: Vec<PathBuf>,
  pub pattern: String,
  pub exclude: Vec<String>,
  pub force: bool,
}

/// Command-line values that override the config file.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
  pub directories: Vec<PathBuf>,
  pub pattern: Option<String>,
  pub exclude: Vec<String>,
  pub force: bool,
}

impl Settings {
  /// Merge CLI overrides over an optional config over built-in defaults.
  ///
  /// Directories and pattern are replaced wholesale by the CLI; exclude
  /// patterns from both sources are combined; `force` is on if either sets it.
  pub fn resolve(cli: CliOverrides, config: Option<Config>) -> Self {
    let config = config.unwrap_or_default();

    let directories = if !cli.directories.is_empty() {
      cli.directories
    } else if let Some(dirs) = config.directories {
      dirs
    } else {
      DEFAULT_DIRECTORIES.into_iter().map(PathBuf::from).collect()
    };

    let pattern = cli
      .pattern
      .or(config.pattern)
      .unwrap_or_else(|| crate::processor::DEFAULT_PATTERN.to_string());

    let mut exclude = config.exclude;
    exclude.extend(cli.exclude);

    Self {
      directories,
      pattern,
      exclude,
      force: cli.force || config.force,
    }
  }
}
