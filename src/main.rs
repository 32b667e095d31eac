//! # incguard
//!
//! A tool that wraps C/C++ headers in include guards derived from their file
//! names.

mod cli;

use anyhow::Result;

use crate::cli::{Cli, run_guard};

fn main() -> Result<()> {
  let cli = Cli::parse_args();
  run_guard(cli.guard_args)
}
