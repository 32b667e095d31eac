//! # File Collector Module
//!
//! This module discovers the header files a run operates on: every regular
//! file matching a filename pattern inside each configured directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors that abort discovery before any file is touched.
#[derive(Debug, Error)]
pub enum DiscoveryError {
  /// A configured directory does not exist.
  #[error("Directory not found: {}", .0.display())]
  MissingDirectory(PathBuf),

  /// A configured path exists but is not a directory.
  #[error("Not a directory: {}", .0.display())]
  NotADirectory(PathBuf),

  /// A configured directory could not be listed.
  #[error("Failed to list directory {}: {source}", .path.display())]
  Unreadable { path: PathBuf, source: std::io::Error },

  /// The filename or exclude pattern is not a valid glob.
  #[error("Invalid glob pattern '{pattern}': {source}")]
  InvalidPattern {
    pattern: String,
    source: glob::PatternError,
  },

  /// A directory entry could not be read while listing.
  #[error("Failed to read entry {}: {source}", .path.display())]
  Entry { path: PathBuf, source: std::io::Error },
}

/// File collector for header discovery.
///
/// The `FileCollector` handles:
/// - Validating that every configured directory exists
/// - Listing files that match the filename pattern in each directory
/// - Dropping excluded and duplicate paths
pub struct FileCollector {
  /// Filename pattern matched inside each directory (e.g. `*.h`)
  pattern: String,

  /// Paths matching any of these patterns are dropped
  exclude: Vec<glob::Pattern>,
}

impl FileCollector {
  /// Creates a new FileCollector.
  ///
  /// # Parameters
  ///
  /// * `pattern` - Filename pattern matched in each directory
  /// * `exclude` - Glob patterns for paths to leave out
  ///
  /// # Errors
  ///
  /// Returns [`DiscoveryError::InvalidPattern`] if any pattern is not a valid
  /// glob.
  pub fn new(pattern: impl Into<String>, exclude: &[String]) -> Result<Self, DiscoveryError> {
    let pattern = pattern.into();
    glob::Pattern::new(&pattern).map_err(|source| DiscoveryError::InvalidPattern {
      pattern: pattern.clone(),
      source,
    })?;

    let exclude = exclude
      .iter()
      .map(|p| {
        glob::Pattern::new(p).map_err(|source| DiscoveryError::InvalidPattern {
          pattern: p.clone(),
          source,
        })
      })
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Self { pattern, exclude })
  }

  /// Collects header paths from every directory, in directory order.
  ///
  /// Within one directory, paths come back in the order the glob listing
  /// yields them. A path reachable from two directories is only returned the
  /// first time it is seen.
  ///
  /// # Errors
  ///
  /// Fails on the first directory that is missing, not a directory, or
  /// cannot be listed. Nothing is returned in that case, so callers never act
  /// on a partial listing.
  pub fn collect(&self, dirs: &[PathBuf]) -> Result<Vec<PathBuf>, DiscoveryError> {
    let start_time = std::time::Instant::now();
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for dir in dirs {
      for path in self.collect_dir(dir)? {
        if self.is_excluded(&path) {
          debug!("Excluding: {}", path.display());
          continue;
        }
        if seen.insert(path.clone()) {
          files.push(path);
        }
      }
    }

    debug!(
      "Found {} headers in {} directories in {}ms",
      files.len(),
      dirs.len(),
      start_time.elapsed().as_millis()
    );

    Ok(files)
  }

  /// Lists matching regular files in a single directory.
  pub fn collect_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    match std::fs::metadata(dir) {
      Ok(meta) if meta.is_dir() => {}
      Ok(_) => return Err(DiscoveryError::NotADirectory(dir.to_path_buf())),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        return Err(DiscoveryError::MissingDirectory(dir.to_path_buf()));
      }
      Err(source) => {
        return Err(DiscoveryError::Unreadable {
          path: dir.to_path_buf(),
          source,
        });
      }
    }

    // Probe readability up front; glob silently skips unreadable directories.
    std::fs::read_dir(dir).map_err(|source| DiscoveryError::Unreadable {
      path: dir.to_path_buf(),
      source,
    })?;

    let full_pattern = glob_in_dir(dir, &self.pattern);
    debug!("Scanning directory: {} ({})", dir.display(), full_pattern);

    let entries = glob::glob(&full_pattern).map_err(|source| DiscoveryError::InvalidPattern {
      pattern: full_pattern.clone(),
      source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
      let path = entry.map_err(|e| DiscoveryError::Entry {
        path: e.path().to_path_buf(),
        source: e.into_error(),
      })?;
      if path.is_file() {
        files.push(path);
      }
    }

    Ok(files)
  }

  fn is_excluded(&self, path: &Path) -> bool {
    self.exclude.iter().any(|pattern| pattern.matches_path(path))
  }
}

/// Joins a directory and a filename pattern into one glob, escaping any glob
/// metacharacters in the directory itself.
fn glob_in_dir(dir: &Path, pattern: &str) -> String {
  let dir = glob::Pattern::escape(&dir.to_string_lossy());
  let dir = dir.trim_end_matches('/');
  if dir.is_empty() {
    format!("/{pattern}")
  } else {
    format!("{dir}/{pattern}")
  }
}
