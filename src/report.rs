//! # Report Module
//!
//! This module records what happened to each header during a run and can
//! write that record as JSON or CSV.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Information about a processed header for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
  /// Path to the header
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  /// Guard macro derived from the path, when derivation succeeded
  pub macro_name: Option<String>,
  /// What happened to the header
  pub action: FileAction,
  /// Diagnostic for failed headers
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl FileReport {
  /// Report for a header whose processing ended with `action`.
  pub fn new(path: impl Into<PathBuf>, macro_name: Option<String>, action: FileAction) -> Self {
    Self {
      path: path.into(),
      macro_name,
      action,
      error: None,
    }
  }

  /// Report for a header that could not be processed.
  pub fn failed(path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      macro_name: None,
      action: FileAction::Failed,
      error: Some(error.into()),
    }
  }
}

/// Possible outcomes for one header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAction {
  /// A guard was written around the header
  Guarded,
  /// The header already had a guard and was left alone
  AlreadyGuarded,
  /// The header lacks a guard; nothing was written (dry-run or check mode)
  MissingGuard,
  /// The header could not be processed
  Failed,
}

impl FileAction {
  const fn label(self) -> &'static str {
    match self {
      FileAction::Guarded => "Guarded",
      FileAction::AlreadyGuarded => "Already guarded",
      FileAction::MissingGuard => "Missing guard",
      FileAction::Failed => "Failed",
    }
  }
}

/// Helper module for serializing/deserializing PathBuf
mod path_serialization {
  use std::path::PathBuf;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &std::path::Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
  /// JSON format for machine readability
  Json,
  /// CSV format for spreadsheet compatibility
  Csv,
}

impl std::fmt::Display for ReportFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ReportFormat::Json => write!(f, "JSON"),
      ReportFormat::Csv => write!(f, "CSV"),
    }
  }
}

/// Summary of a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
  /// Number of headers attempted
  pub total_files: usize,
  /// Headers that received a guard
  pub guarded: usize,
  /// Headers skipped because they already had a guard
  pub already_guarded: usize,
  /// Headers lacking a guard that were not written
  pub missing_guard: usize,
  /// Headers that failed
  pub failed: usize,
  /// Total processing time
  #[serde(skip)]
  pub processing_time: Duration,
  /// Processing time in seconds for serialization
  #[serde(rename = "processing_time_seconds")]
  pub processing_time_secs: f64,
}

impl RunSummary {
  /// Build a summary from a run's reports.
  pub fn from_reports(files: &[FileReport], processing_time: Duration) -> Self {
    let mut summary = Self {
      total_files: files.len(),
      processing_time,
      processing_time_secs: processing_time.as_secs_f64(),
      ..Self::default()
    };

    for file in files {
      match file.action {
        FileAction::Guarded => summary.guarded += 1,
        FileAction::AlreadyGuarded => summary.already_guarded += 1,
        FileAction::MissingGuard => summary.missing_guard += 1,
        FileAction::Failed => summary.failed += 1,
      }
    }

    summary
  }
}

#[derive(Serialize)]
struct JsonReport<'a> {
  generated_at: String,
  summary: &'a RunSummary,
  files: &'a [FileReport],
}

/// Report Generator for writing run reports
pub struct ReportGenerator<'a> {
  /// Format of the report to generate
  format: ReportFormat,
  /// Path where the report will be saved
  output_path: &'a std::path::Path,
}

impl<'a> ReportGenerator<'a> {
  /// Create a new report generator
  ///
  /// # Parameters
  ///
  /// * `format` - The format to use for the report
  /// * `output_path` - The path where the report will be saved
  pub const fn new(format: ReportFormat, output_path: &'a std::path::Path) -> Self {
    Self { format, output_path }
  }

  /// Write a report for `files` and `summary` to the output path.
  pub fn generate(&self, files: &[FileReport], summary: &RunSummary) -> Result<()> {
    let content = match self.format {
      ReportFormat::Json => Self::generate_json(files, summary)?,
      ReportFormat::Csv => Self::generate_csv(files, summary),
    };

    fs::write(self.output_path, content)
      .with_context(|| format!("Failed to write {} report to {}", self.format, self.output_path.display()))
  }

  fn generate_json(files: &[FileReport], summary: &RunSummary) -> Result<String> {
    let report = JsonReport {
      generated_at: Local::now().to_rfc3339(),
      summary,
      files,
    };
    Ok(serde_json::to_string_pretty(&report)?)
  }

  fn generate_csv(files: &[FileReport], summary: &RunSummary) -> String {
    let mut csv = String::from("file_path,macro_name,action,notes\n");

    for file in files {
      let path = file.path.to_string_lossy().replace(',', "%2C");
      let macro_name = file.macro_name.as_deref().unwrap_or("");
      let note = file.error.as_deref().unwrap_or("").replace(',', "%2C");
      csv.push_str(&format!("{},{},{},{}\n", path, macro_name, file.action.label(), note));
    }

    csv.push_str("\n# Summary\n");
    csv.push_str(&format!("Total files processed,{}\n", summary.total_files));
    csv.push_str(&format!("Guards added,{}\n", summary.guarded));
    csv.push_str(&format!("Already guarded,{}\n", summary.already_guarded));
    csv.push_str(&format!("Missing guard,{}\n", summary.missing_guard));
    csv.push_str(&format!("Failed,{}\n", summary.failed));
    csv.push_str(&format!(
      "Processing time (seconds),{:.2}\n",
      summary.processing_time.as_secs_f64()
    ));
    csv.push_str(&format!("Generated on,{}\n", Local::now().format("%Y-%m-%d %H:%M:%S")));

    csv
  }
}
