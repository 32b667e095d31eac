//! # Processor Module
//!
//! This module contains the core functionality for discovering header files
//! and wrapping them in include guards.
//!
//! The module is organized into several submodules:
//! - [`file_collector`] - Header discovery across the configured directories
//! - [`guard_writer`] - Macro name derivation and guarded document rendering
//! - [`file_io`] - File reading and atomic replacement
//!
//! The [`Processor`] struct is the main entry point, orchestrating the
//! submodules. Headers are handled one at a time, in discovery order.

mod file_collector;
mod file_io;
pub mod guard_writer;

use std::path::{Path, PathBuf};

pub use file_collector::{DiscoveryError, FileCollector};
pub use file_io::FileIO;
use thiserror::Error;
use tracing::{debug, trace, warn};

use self::guard_writer::MacroNameError;
use crate::diff::DiffManager;
use crate::guard_detection::{GuardDetector, SimpleGuardDetector};
use crate::output;
use crate::report::{FileAction, FileReport};

/// Default filename pattern for header discovery.
pub const DEFAULT_PATTERN: &str = "*.h";

/// Errors for a single header. None of these abort a run.
#[derive(Debug, Error)]
pub enum EditError {
  /// The path does not name an existing regular file.
  #[error("path {} is not valid", .0.display())]
  NotFound(PathBuf),

  /// No macro name can be derived from the file name.
  #[error("cannot derive a guard macro for {}: {source}", .path.display())]
  InvalidFileName { path: PathBuf, source: MacroNameError },

  /// The header could not be read.
  #[error("failed to read {}: {source}", .path.display())]
  Read { path: PathBuf, source: std::io::Error },

  /// The guarded header could not be written back.
  #[error("failed to write {}: {source}", .path.display())]
  Write { path: PathBuf, source: std::io::Error },
}

/// Successful result of editing one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
  /// Macro derived from the header's file name
  pub macro_name: String,
  /// What was done to the header
  pub action: FileAction,
}

/// Configuration for creating a Processor instance.
pub struct ProcessorConfig {
  /// Filename pattern matched inside each directory
  pub pattern: String,
  /// Glob patterns for paths to leave out
  pub exclude: Vec<String>,
  /// Compute everything but never write
  pub dry_run: bool,
  /// Wrap headers even when they already carry a guard
  pub force: bool,
  pub diff_manager: Option<DiffManager>,
  pub guard_detector: Option<Box<dyn GuardDetector>>,
}

impl ProcessorConfig {
  /// Creates a ProcessorConfig that guards `*.h` files in place.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// ProcessorConfig {
  ///     dry_run: true,
  ///     ..ProcessorConfig::new()
  /// }
  /// ```
  pub fn new() -> Self {
    Self {
      pattern: DEFAULT_PATTERN.to_string(),
      exclude: Vec::new(),
      dry_run: false,
      force: false,
      diff_manager: None,
      guard_detector: None,
    }
  }
}

impl Default for ProcessorConfig {
  fn default() -> Self {
    Self::new()
  }
}

/// Processor for adding include guards to headers.
///
/// The `Processor` is responsible for:
/// - Discovering headers in the configured directories
/// - Deriving each header's guard macro from its file name
/// - Rewriting headers with the guard wrapped around their contents
/// - Skipping headers that already carry a guard (unless forced)
/// - Showing diffs and collecting per-file reports
pub struct Processor {
  /// Discovers headers in directories
  file_collector: FileCollector,

  /// Whether to skip all writes
  dry_run: bool,

  /// Whether to wrap headers that already have a guard
  force: bool,

  /// Manager for handling diff creation and rendering
  diff_manager: DiffManager,

  /// Detector for pre-existing guards
  guard_detector: Box<dyn GuardDetector>,
}

impl Processor {
  /// Creates a new processor with the specified configuration.
  ///
  /// # Errors
  ///
  /// Returns an error if the filename pattern or any exclude pattern is not a
  /// valid glob.
  pub fn new(config: ProcessorConfig) -> Result<Self, DiscoveryError> {
    let file_collector = FileCollector::new(config.pattern, &config.exclude)?;

    Ok(Self {
      file_collector,
      dry_run: config.dry_run,
      force: config.force,
      diff_manager: config.diff_manager.unwrap_or_else(|| DiffManager::new(false, None)),
      guard_detector: config
        .guard_detector
        .unwrap_or_else(|| Box::new(SimpleGuardDetector::new())),
    })
  }

  /// Whether this processor only reports without writing.
  pub const fn is_dry_run(&self) -> bool {
    self.dry_run
  }

  /// Discovers the headers in `dirs` without touching them.
  ///
  /// # Errors
  ///
  /// Any missing or unreadable directory aborts discovery.
  pub fn collect_files(&self, dirs: &[PathBuf]) -> Result<Vec<PathBuf>, DiscoveryError> {
    self.file_collector.collect(dirs)
  }

  /// Discovers and processes every header in `dirs`.
  ///
  /// Discovery completes before the first header is edited, so a discovery
  /// error leaves every file untouched.
  pub fn process(&self, dirs: &[PathBuf]) -> Result<Vec<FileReport>, DiscoveryError> {
    let files = self.collect_files(dirs)?;
    Ok(self.process_paths(&files))
  }

  /// Processes already-discovered headers in order.
  ///
  /// Per-file failures are reported and recorded; the remaining headers are
  /// still processed.
  pub fn process_paths(&self, paths: &[PathBuf]) -> Vec<FileReport> {
    debug!("Processing {} headers", paths.len());
    paths.iter().map(|path| self.process_file(path)).collect()
  }

  /// Adds a guard to one header, returning whether it succeeded.
  ///
  /// A missing or unreadable header prints a diagnostic naming the path and
  /// returns `false` without touching the filesystem.
  pub fn edit(&self, path: &Path) -> bool {
    self.process_file(path).action != FileAction::Failed
  }

  /// Runs [`Processor::try_edit`] and reports the outcome to the console.
  fn process_file(&self, path: &Path) -> FileReport {
    match self.try_edit(path) {
      Ok(outcome) => {
        match outcome.action {
          FileAction::Guarded => output::print_done(path),
          FileAction::AlreadyGuarded => output::print_already_guarded(path, &outcome.macro_name),
          FileAction::MissingGuard => output::print_missing_guard(path, &outcome.macro_name),
          FileAction::Failed => {}
        }
        FileReport::new(path, Some(outcome.macro_name), outcome.action)
      }
      Err(e) => {
        let message = e.to_string();
        output::print_edit_error(&message);
        FileReport::failed(path, message)
      }
    }
  }

  /// Adds a guard to one header.
  ///
  /// Steps, in order:
  /// 1. Fail with [`EditError::NotFound`] unless `path` is a regular file
  /// 2. Read the full contents
  /// 3. Derive the macro name from the file name
  /// 4. Skip the header if it already has a guard and `force` is off
  /// 5. Render the guarded document, show the diff, and replace the file
  ///
  /// In dry-run mode step 5 stops before writing and reports
  /// [`FileAction::MissingGuard`].
  ///
  /// # Errors
  ///
  /// Every error leaves the header unmodified.
  pub fn try_edit(&self, path: &Path) -> Result<EditOutcome, EditError> {
    trace!("Processing file: {}", path.display());

    if !path.is_file() {
      return Err(EditError::NotFound(path.to_path_buf()));
    }

    let original = FileIO::read_full_content(path).map_err(|source| EditError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let macro_name = guard_writer::macro_name(path).map_err(|source| EditError::InvalidFileName {
      path: path.to_path_buf(),
      source,
    })?;

    if !guard_writer::is_valid_identifier(&macro_name) {
      warn!(
        "Guard macro {} for {} is not a valid C identifier",
        macro_name,
        path.display()
      );
    }

    if !self.force && self.guard_detector.has_guard(&original) {
      debug!("Skipping: {} (already guarded)", path.display());
      return Ok(EditOutcome {
        macro_name,
        action: FileAction::AlreadyGuarded,
      });
    }

    let guarded = guard_writer::render_guarded(&macro_name, &original);

    if let Err(e) = self.diff_manager.display_diff(path, &original, &guarded) {
      eprintln!("Warning: Failed to display diff for {}: {:#}", path.display(), e);
    }

    if self.dry_run {
      return Ok(EditOutcome {
        macro_name,
        action: FileAction::MissingGuard,
      });
    }

    FileIO::replace_file(path, &guarded).map_err(|source| EditError::Write {
      path: path.to_path_buf(),
      source,
    })?;

    debug!("Guarded {} with {}", path.display(), macro_name);
    Ok(EditOutcome {
      macro_name,
      action: FileAction::Guarded,
    })
  }
}
