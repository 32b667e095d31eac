//! # incguard
//!
//! A tool that batch-inserts include guards into C/C++ header files.
//!
//! For every header matching a pattern (default `*.h`) in a set of
//! directories (default `kernel` and `user`), `incguard` derives a macro name
//! from the file name (`kernel/types.h` becomes `TYPES_H`) and rewrites the
//! file as:
//!
//! ```text
//! #pragma once
//! #ifndef TYPES_H
//! #define TYPES_H
//!
//! <original contents>
//!
//! #endif // TYPES_H
//! ```
//!
//! Headers are rewritten atomically through a temporary file. Headers that
//! already carry a guard are skipped unless forced.
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use incguard::processor::{Processor, ProcessorConfig};
//! use incguard::report::FileAction;
//!
//! fn main() -> anyhow::Result<()> {
//!     let processor = Processor::new(ProcessorConfig::new())?;
//!
//!     let reports = processor.process(&[PathBuf::from("kernel"), PathBuf::from("user")])?;
//!     let failed = reports.iter().filter(|r| r.action == FileAction::Failed).count();
//!     println!("{failed} headers failed");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`processor`] - Header discovery and guard insertion
//! * [`guard_detection`] - Detection of guards that are already present
//! * [`config`] - `.incguard.toml` loading and settings resolution
//! * [`logging`] - Logging utilities for verbose output

pub mod config;
pub mod diff;
pub mod guard_detection;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
