//! # File I/O Module
//!
//! This module provides file reading and writing utilities for the processor.
//! Writes go through a temporary file in the target's directory that is then
//! renamed over the original, so an interrupted run never leaves a truncated
//! header behind.

use std::io::{self, Write as _};
use std::path::Path;

use tempfile::NamedTempFile;

/// File I/O operations for the processor.
///
/// This struct provides static methods for reading and writing files.
pub struct FileIO;

impl FileIO {
  /// Read full file content as raw bytes.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file to read
  pub fn read_full_content(path: &Path) -> io::Result<Vec<u8>> {
    std::fs::read(path)
  }

  /// Atomically replace a file's content.
  ///
  /// The new content is written to a temporary file next to the real file,
  /// flushed, given the original file's permissions, and then renamed over
  /// it. Symlinks are resolved first, so the link stays in place and its
  /// target receives the new content.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file to replace
  /// * `content` - Complete new content
  pub fn replace_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let target = std::fs::canonicalize(path)?;
    let dir = target.parent().unwrap_or_else(|| Path::new("."));

    let permissions = std::fs::metadata(&target)?.permissions();

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    std::fs::set_permissions(tmp.path(), permissions)?;

    // Dropping `tmp` on any error above removes the temporary file.
    tmp.persist(&target).map_err(|e| e.error)?;

    Ok(())
  }
}
