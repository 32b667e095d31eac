//! # Guard Command
//!
//! This module implements the default (and only) command: discover headers
//! and wrap each one in an include guard.

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use incguard::config::{CliOverrides, Settings, load_config};
use incguard::diff::DiffManager;
use incguard::info_log;
use incguard::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use incguard::output::{print_blank_line, print_hint, print_start_message, print_summary};
use incguard::processor::{Processor, ProcessorConfig};
use incguard::report::{ReportFormat, ReportGenerator, RunSummary};
use tracing::debug;

/// Arguments for the guard command
#[derive(Args, Debug, Default)]
pub struct GuardArgs {
  /// Directories whose headers are guarded, in order [default: kernel user]
  #[arg(value_name = "DIR")]
  pub dirs: Vec<PathBuf>,

  /// Filename pattern matched in each directory [default: *.h]
  #[arg(long, short = 'p', value_name = "GLOB")]
  pub pattern: Option<String>,

  /// Skip paths matching this glob (repeatable)
  #[arg(long, short = 'e', value_name = "GLOB")]
  pub exclude: Vec<String>,

  /// Compute every change but do not write any file
  #[arg(long)]
  pub dry_run: bool,

  /// Like --dry-run, but exit with status 1 if any header lacks a guard
  #[arg(long)]
  pub check: bool,

  /// Print a diff of each change to stderr
  #[arg(long)]
  pub show_diff: bool,

  /// Save the diff of all changes to a file
  #[arg(long, short = 'o', value_name = "FILE")]
  pub save_diff: Option<PathBuf>,

  /// Wrap headers even if they already have a guard (nests guards)
  #[arg(long)]
  pub force: bool,

  /// Path to config file (default: .incguard.toml in the current directory)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Write a JSON report of the run to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Write a CSV report of the run to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_csv: Option<PathBuf>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

/// Run the guard command with the given arguments
pub fn run_guard(args: GuardArgs) -> Result<()> {
  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let current_dir = std::env::current_dir().context("Failed to get current directory")?;
  let config = load_config(args.config.as_deref(), &current_dir, args.no_config)?;
  if config.is_some() {
    debug!("Using configuration file");
  }

  let settings = Settings::resolve(
    CliOverrides {
      directories: args.dirs,
      pattern: args.pattern,
      exclude: args.exclude,
      force: args.force,
    },
    config,
  );
  debug!("Resolved settings: {:?}", settings);

  let dry_run = args.dry_run || args.check;

  let diff_manager = DiffManager::new(args.show_diff, args.save_diff);
  diff_manager.init()?;

  let processor = Processor::new(ProcessorConfig {
    pattern: settings.pattern,
    exclude: settings.exclude,
    dry_run,
    force: settings.force,
    diff_manager: Some(diff_manager),
    guard_detector: None,
  })?;

  // Discovery must finish before any header is touched.
  let files = processor
    .collect_files(&settings.directories)
    .context("Header discovery failed; no files were modified")?;

  print_start_message(files.len(), dry_run);

  let start_time = Instant::now();
  let file_reports = processor.process_paths(&files);
  let summary = RunSummary::from_reports(&file_reports, start_time.elapsed());

  print_blank_line();
  print_summary(&summary, dry_run);

  if dry_run && summary.missing_guard > 0 {
    print_blank_line();
    print_hint("Run without --dry-run/--check to add the missing guards.");
  }

  for (format, path) in [
    (ReportFormat::Json, args.report_json.as_ref()),
    (ReportFormat::Csv, args.report_csv.as_ref()),
  ] {
    let Some(output_path) = path else {
      continue;
    };
    let report_generator = ReportGenerator::new(format, output_path);
    if let Err(e) = report_generator.generate(&file_reports, &summary) {
      eprintln!("Error generating {} report: {:#}", format, e);
    } else {
      info_log!("Generated {} report at {}", format, output_path.display());
    }
  }

  if args.check && summary.missing_guard > 0 {
    process::exit(1);
  }

  Ok(())
}
