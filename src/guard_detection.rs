//! # Guard Detection Module
//!
//! This module contains the interfaces and implementations for detecting
//! include guards that are already present in a header. It allows the
//! detection rule to be swapped without modifying the processor.

use std::sync::LazyLock;

use regex::Regex;

/// Number of bytes inspected at each end of a header when looking for an
/// existing guard.
const GUARD_SCAN_LIMIT: usize = 4 * 1024;

/// Trait for guard detectors.
///
/// Implementations decide whether a header already carries an include guard
/// based on its raw contents.
pub trait GuardDetector: Send + Sync {
  /// Returns `true` if `content` appears to be guarded already.
  fn has_guard(&self, content: &[u8]) -> bool;
}

/// Default guard detector.
///
/// Skips leading blank lines and comments, then accepts either a
/// `#pragma once` directive, or an `#ifndef X` immediately followed by a bare
/// `#define X` when the last significant line is an `#endif`.
///
/// `#ifndef BSIZE` / `#define BSIZE 1024` is a default value, not a guard.
pub struct SimpleGuardDetector;

impl SimpleGuardDetector {
  /// Creates a new SimpleGuardDetector.
  pub const fn new() -> Self {
    SimpleGuardDetector
  }
}

impl Default for SimpleGuardDetector {
  fn default() -> Self {
    Self::new()
  }
}

static PRAGMA_ONCE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^#\s*pragma\s+once\b").expect("pragma regex must compile"));

static IFNDEF: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^#\s*ifndef\s+([A-Za-z_][A-Za-z0-9_]*)").expect("ifndef regex must compile"));

// A guard define has no value; only a trailing comment may follow the name.
static DEFINE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^#\s*define\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?://.*|/\*.*)?$").expect("define regex must compile")
});

static ENDIF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#\s*endif\b").expect("endif regex must compile"));

impl GuardDetector for SimpleGuardDetector {
  fn has_guard(&self, content: &[u8]) -> bool {
    let check_len = content.len().min(GUARD_SCAN_LIMIT);
    let text = String::from_utf8_lossy(&content[..check_len]);

    let mut lines = significant_lines(&text);
    let Some(first) = lines.next() else {
      return false;
    };

    if PRAGMA_ONCE.is_match(first) {
      return true;
    }

    let Some(guard) = IFNDEF.captures(first) else {
      return false;
    };

    let defines_guard = lines
      .next()
      .and_then(|second| DEFINE.captures(second))
      .is_some_and(|define| define[1] == guard[1]);

    defines_guard && ends_with_endif(content)
  }
}

/// Whether the last significant line of `content` is an `#endif`.
fn ends_with_endif(content: &[u8]) -> bool {
  let tail_start = content.len().saturating_sub(GUARD_SCAN_LIMIT);
  let text = String::from_utf8_lossy(&content[tail_start..]);

  significant_lines(&text).last().is_some_and(|line| ENDIF.is_match(line))
}

/// Iterates over trimmed lines, skipping blanks and comment-only lines.
fn significant_lines(text: &str) -> impl Iterator<Item = &str> {
  let mut in_block_comment = false;

  text.lines().map(str::trim).filter(move |line| {
    if in_block_comment {
      if line.contains("*/") {
        in_block_comment = false;
      }
      return false;
    }
    if line.is_empty() || line.starts_with("//") {
      return false;
    }
    if line.starts_with("/*") {
      in_block_comment = !line.contains("*/");
      return false;
    }
    true
  })
}
