//! # Guard Writer Module
//!
//! This module derives include-guard macro names from header paths and renders
//! the guarded document that replaces a header's contents.
//!
//! The rendered layout is fixed:
//!
//! ```text
//! #pragma once
//! #ifndef FOO_H
//! #define FOO_H
//!
//! <original contents, byte for byte>
//!
//! #endif // FOO_H
//! ```

use std::path::Path;

use thiserror::Error;

/// Suffix appended to the uppercased base name.
pub const MACRO_SUFFIX: &str = "_H";

/// Reasons a header path cannot produce a macro name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MacroNameError {
  /// The path has no final file name component (e.g. `/` or `..`).
  #[error("path has no file name")]
  MissingFileName,

  /// The file name has no extension to strip.
  #[error("file name '{0}' has no extension")]
  MissingExtension(String),

  /// Stripping the extension left nothing behind.
  #[error("file name '{0}' has an empty base name")]
  EmptyBaseName(String),
}

/// Returns the header's base name: its file name with the final extension
/// removed.
pub fn base_name(path: &Path) -> Result<String, MacroNameError> {
  let file_name = path
    .file_name()
    .ok_or(MacroNameError::MissingFileName)?
    .to_string_lossy()
    .into_owned();

  // `file_stem` treats a leading dot as part of the name, so `.h` has no
  // extension and is rejected here rather than producing `_H`.
  if path.extension().is_none() {
    return Err(MacroNameError::MissingExtension(file_name));
  }

  let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
  if stem.is_empty() {
    return Err(MacroNameError::EmptyBaseName(file_name));
  }

  Ok(stem)
}

/// Derives the include-guard macro for a header path.
///
/// `kernel/types.h` becomes `TYPES_H`.
pub fn macro_name(path: &Path) -> Result<String, MacroNameError> {
  let base = base_name(path)?;
  let mut name = base.to_ascii_uppercase();
  name.push_str(MACRO_SUFFIX);
  Ok(name)
}

/// Checks whether a macro name is a usable C preprocessor identifier.
///
/// Names like `FOO-BAR_H` are still emitted; callers only warn about them.
pub fn is_valid_identifier(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
    _ => false,
  }
}

/// Renders the guard preamble for a macro, including the blank separator line.
pub fn preamble(macro_name: &str) -> String {
  format!("#pragma once\n#ifndef {macro_name}\n#define {macro_name}\n\n")
}

/// Renders the guard postamble for a macro, including the blank separator line.
///
/// There is no trailing newline after the `#endif` line.
pub fn postamble(macro_name: &str) -> String {
  format!("\n#endif // {macro_name}")
}

/// Wraps `contents` in the guard for `macro_name`.
///
/// The original bytes are copied unchanged, so files that are not valid UTF-8
/// survive the rewrite intact.
pub fn render_guarded(macro_name: &str, contents: &[u8]) -> Vec<u8> {
  let head = preamble(macro_name);
  let tail = postamble(macro_name);

  let mut out = Vec::with_capacity(head.len() + contents.len() + tail.len());
  out.extend_from_slice(head.as_bytes());
  out.extend_from_slice(contents);
  out.extend_from_slice(tail.as_bytes());
  out
}
