#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Writes `content` to `root/rel`, creating parent directories.
pub fn write_header(root: &Path, rel: &str, content: &str) -> Result<PathBuf> {
  let path = root.join(rel);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(path)
}

/// Creates the conventional `kernel/` and `user/` layout with a few headers.
///
/// Returns the header paths in the order discovery is expected to yield them.
pub fn setup_kernel_user_tree(root: &Path) -> Result<Vec<PathBuf>> {
  let defs = write_header(root, "kernel/defs.h", "struct proc;\nvoid panic(char*);\n")?;
  let types = write_header(root, "kernel/types.h", "typedef unsigned int uint;\n")?;
  write_header(root, "kernel/proc.c", "#include \"types.h\"\n")?;
  let user = write_header(root, "user/user.h", "int fork(void);\nint exit(int) __attribute__((noreturn));\n")?;
  Ok(vec![defs, types, user])
}

/// The exact guarded form of `content` for `macro_name`.
pub fn expected_guarded(macro_name: &str, content: &str) -> String {
  format!("#pragma once\n#ifndef {macro_name}\n#define {macro_name}\n\n{content}\n#endif // {macro_name}")
}

/// Snapshot of every file under `root`, sorted by path.
pub fn snapshot(root: &Path) -> Result<Vec<(PathBuf, Vec<u8>)>> {
  let mut files = Vec::new();
  let mut dirs = vec![root.to_path_buf()];
  while let Some(dir) = dirs.pop() {
    for entry in fs::read_dir(&dir)? {
      let path = entry?.path();
      if path.is_dir() {
        dirs.push(path);
      } else {
        let content = fs::read(&path)?;
        files.push((path, content));
      }
    }
  }
  files.sort();
  Ok(files)
}
