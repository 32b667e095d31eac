//! # Output Module
//!
//! This module centralizes all user-facing output for incguard. Progress
//! lines go to stdout; per-file diagnostics go to stderr.

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::logging::is_quiet;
use crate::report::RunSummary;

/// Symbols used in output
pub mod symbols {
  /// Guard written
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Skipped
  pub const SKIPPED: &str = "-";
}

/// Print the initial "Processing N headers..." message.
pub fn print_start_message(file_count: usize, dry_run: bool) {
  if is_quiet() {
    return;
  }

  let verb = if dry_run { "Checking" } else { "Processing" };
  let noun = if file_count == 1 { "header" } else { "headers" };
  println!("{} {} {}...", verb, file_count, noun);
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Report a header that received its guard.
pub fn print_done(path: &Path) {
  if is_quiet() {
    return;
  }
  println!("Done with {}", path.display());
}

/// Report a header that was skipped because it already had a guard.
pub fn print_already_guarded(path: &Path, macro_name: &str) {
  if is_quiet() {
    return;
  }
  println!(
    "{} {} already guarded (would use {})",
    symbols::SKIPPED.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    path.display(),
    macro_name
  );
}

/// Report a header that lacks a guard in dry-run or check mode.
pub fn print_missing_guard(path: &Path, macro_name: &str) {
  if is_quiet() {
    // Bare paths for scripting
    println!("{}", path.display());
    return;
  }
  println!(
    "{} {} is missing guard {}",
    symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
    path.display(),
    macro_name
  );
}

/// Report a header that could not be processed.
///
/// Always printed, even in quiet mode.
pub fn print_edit_error(message: &str) {
  eprintln!("{}", message.if_supports_color(Stream::Stderr, |m| m.red()));
}

/// Print the final summary line.
pub fn print_summary(summary: &RunSummary, dry_run: bool) {
  if is_quiet() {
    return;
  }

  let mut parts = Vec::new();
  if dry_run {
    parts.push(format!("{} missing a guard", summary.missing_guard));
  } else {
    parts.push(format!("{} guarded", summary.guarded));
  }
  parts.push(format!("{} already guarded", summary.already_guarded));
  if summary.failed > 0 {
    parts.push(format!("{} failed", summary.failed));
  }

  let symbol = if summary.failed > 0 {
    symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else {
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()).to_string()
  };

  println!(
    "{} {} {} ({}) in {:.2}s",
    symbol,
    summary.total_files,
    if summary.total_files == 1 { "header" } else { "headers" },
    parts.join(", "),
    summary.processing_time.as_secs_f64()
  );
}

/// Print a hint line (dimmed).
pub fn print_hint(hint: &str) {
  if is_quiet() {
    return;
  }
  println!("{}", hint.if_supports_color(Stream::Stdout, |s| s.dimmed()));
}
