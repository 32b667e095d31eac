//! End-to-end tests for header discovery and guard insertion through the
//! library API.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic_in_result_fn)]

mod common;

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use common::{expected_guarded, setup_kernel_user_tree, snapshot, write_header};
use incguard::processor::guard_writer::macro_name;
use incguard::processor::{DiscoveryError, Processor, ProcessorConfig};
use incguard::report::FileAction;
use tempfile::tempdir;

fn default_processor() -> Result<Processor> {
  Ok(Processor::new(ProcessorConfig::new())?)
}

#[test]
fn test_scenario_single_kernel_header() -> Result<()> {
  let temp_dir = tempdir()?;
  let foo = write_header(temp_dir.path(), "kernel/foo.h", "int x;\n")?;
  fs::create_dir_all(temp_dir.path().join("user"))?;

  let processor = default_processor()?;
  let reports = processor.process(&[temp_dir.path().join("kernel"), temp_dir.path().join("user")])?;

  assert_eq!(reports.len(), 1);
  assert_eq!(reports[0].action, FileAction::Guarded);
  assert_eq!(reports[0].macro_name.as_deref(), Some("FOO_H"));
  assert_eq!(
    fs::read_to_string(&foo)?,
    "#pragma once\n#ifndef FOO_H\n#define FOO_H\n\nint x;\n\n#endif // FOO_H"
  );
  Ok(())
}

#[test]
fn test_header_deleted_mid_run_does_not_abort() -> Result<()> {
  let temp_dir = tempdir()?;
  let first = write_header(temp_dir.path(), "user/a.h", "int a;\n")?;
  let gone = write_header(temp_dir.path(), "user/bar.h", "int bar;\n")?;
  let last = write_header(temp_dir.path(), "user/c.h", "int c;\n")?;

  let processor = default_processor()?;
  let files = processor.collect_files(&[temp_dir.path().join("user")])?;
  assert_eq!(files, vec![first.clone(), gone.clone(), last.clone()]);

  fs::remove_file(&gone)?;
  let reports = processor.process_paths(&files);

  assert_eq!(reports.len(), 3);
  assert_eq!(reports[0].action, FileAction::Guarded);
  assert_eq!(reports[1].action, FileAction::Failed);
  assert!(reports[1].error.as_deref().unwrap().contains("is not valid"));
  assert_eq!(reports[2].action, FileAction::Guarded);

  assert!(!gone.exists());
  assert_eq!(fs::read_to_string(&last)?, expected_guarded("C_H", "int c;\n"));
  Ok(())
}

#[test]
fn test_empty_header() -> Result<()> {
  let temp_dir = tempdir()?;
  let empty = write_header(temp_dir.path(), "user/empty.h", "")?;

  let processor = default_processor()?;
  assert!(processor.edit(&empty));

  assert_eq!(
    fs::read_to_string(&empty)?,
    "#pragma once\n#ifndef EMPTY_H\n#define EMPTY_H\n\n\n#endif // EMPTY_H"
  );
  Ok(())
}

#[test]
fn test_macro_name_from_base_name() {
  for (path, expected) in [
    ("kernel/types.h", "TYPES_H"),
    ("kernel/memlayout.h", "MEMLAYOUT_H"),
    ("user/user.h", "USER_H"),
    ("./kernel/sleeplock.h", "SLEEPLOCK_H"),
    ("MixedCase.h", "MIXEDCASE_H"),
  ] {
    assert_eq!(macro_name(&PathBuf::from(path)).unwrap(), expected, "for {path}");
  }
}

#[test]
fn test_original_content_preserved_between_guards() -> Result<()> {
  let temp_dir = tempdir()?;
  let content = "// comment\n#include <stdint.h>\r\n\n\ttypedef uint64_t pte_t;\nint no_trailing_newline;";
  let path = write_header(temp_dir.path(), "kernel/riscv.h", content)?;

  let processor = default_processor()?;
  assert!(processor.edit(&path));

  let rewritten = fs::read_to_string(&path)?;
  let head = "#pragma once\n#ifndef RISCV_H\n#define RISCV_H\n\n";
  let tail = "\n#endif // RISCV_H";
  assert!(rewritten.starts_with(head));
  assert!(rewritten.ends_with(tail));
  assert_eq!(&rewritten[head.len()..rewritten.len() - tail.len()], content);
  Ok(())
}

#[test]
fn test_non_utf8_content_preserved() -> Result<()> {
  let temp_dir = tempdir()?;
  let path = temp_dir.path().join("latin1.h");
  let content = [b'/', b'/', b' ', 0xE9, b'\n', b'i', b'n', b't', b';', b'\n'];
  fs::write(&path, content)?;

  let processor = default_processor()?;
  assert!(processor.edit(&path));

  let rewritten = fs::read(&path)?;
  let head = b"#pragma once\n#ifndef LATIN1_H\n#define LATIN1_H\n\n";
  assert_eq!(&rewritten[..head.len()], head);
  assert_eq!(&rewritten[head.len()..head.len() + content.len()], &content);
  assert!(rewritten.ends_with(b"\n#endif // LATIN1_H"));
  Ok(())
}

#[test]
fn test_structural_shape_for_every_header() -> Result<()> {
  let temp_dir = tempdir()?;
  let headers = setup_kernel_user_tree(temp_dir.path())?;

  let processor = default_processor()?;
  let reports = processor.process(&[temp_dir.path().join("kernel"), temp_dir.path().join("user")])?;
  assert!(reports.iter().all(|r| r.action == FileAction::Guarded));

  for header in headers {
    let name = macro_name(&header)?;
    let rewritten = fs::read_to_string(&header)?;
    let mut lines = rewritten.lines();
    assert_eq!(lines.next(), Some("#pragma once"));
    assert_eq!(lines.next(), Some(format!("#ifndef {name}").as_str()));
    assert_eq!(lines.next(), Some(format!("#define {name}").as_str()));
    assert!(rewritten.ends_with(&format!("#endif // {name}")));
  }

  // Non-matching files are left alone.
  assert_eq!(
    fs::read_to_string(temp_dir.path().join("kernel/proc.c"))?,
    "#include \"types.h\"\n"
  );
  Ok(())
}

#[test]
fn test_missing_file_performs_no_writes() -> Result<()> {
  let temp_dir = tempdir()?;
  setup_kernel_user_tree(temp_dir.path())?;
  let before = snapshot(temp_dir.path())?;

  let processor = default_processor()?;
  let missing = temp_dir.path().join("kernel/missing.h");
  assert!(!processor.edit(&missing));

  assert!(!missing.exists());
  assert_eq!(snapshot(temp_dir.path())?, before);
  Ok(())
}

#[test]
fn test_second_run_skips_guarded_headers() -> Result<()> {
  let temp_dir = tempdir()?;
  let path = write_header(temp_dir.path(), "kernel/spinlock.h", "struct spinlock;\n")?;

  let processor = default_processor()?;
  assert_eq!(processor.try_edit(&path)?.action, FileAction::Guarded);
  let once = fs::read_to_string(&path)?;

  let second = processor.try_edit(&path)?;
  assert_eq!(second.action, FileAction::AlreadyGuarded);
  assert_eq!(second.macro_name, "SPINLOCK_H");
  assert_eq!(fs::read_to_string(&path)?, once);
  assert_eq!(once.matches("#ifndef SPINLOCK_H").count(), 1);
  Ok(())
}

#[test]
fn test_forced_second_run_nests_guards() -> Result<()> {
  let temp_dir = tempdir()?;
  let content = "struct spinlock;\n";
  let path = write_header(temp_dir.path(), "kernel/spinlock.h", content)?;

  let processor = Processor::new(ProcessorConfig {
    force: true,
    ..ProcessorConfig::new()
  })?;
  assert!(processor.edit(&path));
  assert!(processor.edit(&path));

  let rewritten = fs::read_to_string(&path)?;
  let once = expected_guarded("SPINLOCK_H", content);
  assert_eq!(rewritten, expected_guarded("SPINLOCK_H", &once));
  assert_eq!(rewritten.matches("#ifndef SPINLOCK_H").count(), 2);
  assert_eq!(rewritten.matches("#endif // SPINLOCK_H").count(), 2);
  Ok(())
}

#[test]
fn test_missing_directory_aborts_before_any_write() -> Result<()> {
  let temp_dir = tempdir()?;
  write_header(temp_dir.path(), "kernel/types.h", "typedef unsigned int uint;\n")?;
  let before = snapshot(temp_dir.path())?;

  let processor = default_processor()?;
  let result = processor.process(&[temp_dir.path().join("kernel"), temp_dir.path().join("user")]);

  assert!(matches!(result, Err(DiscoveryError::MissingDirectory(_))));
  assert_eq!(snapshot(temp_dir.path())?, before);
  Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
  let temp_dir = tempdir()?;
  setup_kernel_user_tree(temp_dir.path())?;
  let before = snapshot(temp_dir.path())?;

  let processor = Processor::new(ProcessorConfig {
    dry_run: true,
    ..ProcessorConfig::new()
  })?;
  let reports = processor.process(&[temp_dir.path().join("kernel"), temp_dir.path().join("user")])?;

  assert_eq!(reports.len(), 3);
  assert!(reports.iter().all(|r| r.action == FileAction::MissingGuard));
  assert_eq!(snapshot(temp_dir.path())?, before);
  Ok(())
}

#[test]
fn test_each_header_processed_once() -> Result<()> {
  let temp_dir = tempdir()?;
  let path = write_header(temp_dir.path(), "kernel/param.h", "#define NPROC 64\n")?;

  let processor = Processor::new(ProcessorConfig {
    force: true,
    ..ProcessorConfig::new()
  })?;
  let kernel = temp_dir.path().join("kernel");
  let reports = processor.process(&[kernel.clone(), kernel])?;

  assert_eq!(reports.len(), 1);
  assert_eq!(
    fs::read_to_string(&path)?,
    expected_guarded("PARAM_H", "#define NPROC 64\n")
  );
  Ok(())
}

#[test]
fn test_custom_pattern_and_exclude() -> Result<()> {
  let temp_dir = tempdir()?;
  let vec_hpp = write_header(temp_dir.path(), "include/vec.hpp", "template <class T> struct vec;\n")?;
  let gen_hpp = write_header(temp_dir.path(), "include/gen_tables.hpp", "int tables[];\n")?;
  let plain_h = write_header(temp_dir.path(), "include/plain.h", "int plain;\n")?;

  let processor = Processor::new(ProcessorConfig {
    pattern: "*.hpp".to_string(),
    exclude: vec!["**/gen_*".to_string()],
    ..ProcessorConfig::new()
  })?;
  let reports = processor.process(&[temp_dir.path().join("include")])?;

  assert_eq!(reports.len(), 1);
  assert_eq!(reports[0].path, vec_hpp);
  assert!(fs::read_to_string(&vec_hpp)?.starts_with("#pragma once\n#ifndef VEC_H\n"));
  assert_eq!(fs::read_to_string(&gen_hpp)?, "int tables[];\n");
  assert_eq!(fs::read_to_string(&plain_h)?, "int plain;\n");
  Ok(())
}

#[test]
fn test_default_value_idiom_still_gets_guard() -> Result<()> {
  let temp_dir = tempdir()?;
  let content = "#ifndef BSIZE\n#define BSIZE 1024\n#endif\nstruct buf { char data[BSIZE]; };\n";
  let path = write_header(temp_dir.path(), "kernel/buf.h", content)?;

  let processor = default_processor()?;
  let outcome = processor.try_edit(&path)?;

  assert_eq!(outcome.action, FileAction::Guarded);
  assert_eq!(fs::read_to_string(&path)?, expected_guarded("BUF_H", content));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_symlinked_header_guards_its_target() -> Result<()> {
  let temp_dir = tempdir()?;
  let target = write_header(temp_dir.path(), "shared/real.h", "int r;\n")?;
  fs::create_dir_all(temp_dir.path().join("kernel"))?;
  let link = temp_dir.path().join("kernel/real.h");
  std::os::unix::fs::symlink(&target, &link)?;

  let processor = default_processor()?;
  assert!(processor.edit(&link));

  assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
  assert_eq!(fs::read_to_string(&target)?, expected_guarded("REAL_H", "int r;\n"));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_unreadable_header_fails_and_run_continues() -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let temp_dir = tempdir()?;
  let locked = write_header(temp_dir.path(), "kernel/locked.h", "int locked;\n")?;
  let next = write_header(temp_dir.path(), "kernel/next.h", "int next;\n")?;
  fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

  // Privileged users can read the file anyway; nothing to check then.
  if fs::read(&locked).is_ok() {
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644))?;
    return Ok(());
  }

  let processor = default_processor()?;
  let reports = processor.process_paths(&[locked.clone(), next.clone()]);

  fs::set_permissions(&locked, fs::Permissions::from_mode(0o644))?;

  assert_eq!(reports.len(), 2);
  assert_eq!(reports[0].action, FileAction::Failed);
  assert!(reports[0].error.as_deref().unwrap().starts_with("failed to read"));
  assert_eq!(reports[1].action, FileAction::Guarded);
  assert_eq!(fs::read_to_string(&locked)?, "int locked;\n");
  assert_eq!(fs::read_to_string(&next)?, expected_guarded("NEXT_H", "int next;\n"));
  Ok(())
}
