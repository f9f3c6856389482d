//! External program discovery and execution.
//!
//! [`PathIndex`] is built once at startup by scanning every directory of the
//! search path and is treated as an immutable snapshot afterwards; later
//! `PATH` changes are not picked up.

use crate::redirect::Stdout;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Mapping from executable name to its resolved filesystem location.
pub struct PathIndex {
    programs: HashMap<String, PathBuf>,
}

impl PathIndex {
    /// Scan each directory of `search_path` (platform path-separator joined),
    /// in listed order, and index every regular file that is executable by the
    /// current user. Directories that are missing or unreadable are skipped
    /// silently. Duplicate names across directories resolve to the directory
    /// scanned last, since each entry is inserted unconditionally.
    pub fn scan(search_path: &OsStr) -> Self {
        let mut programs = HashMap::new();
        for dir in std::env::split_paths(search_path) {
            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if !is_executable_file(&path) {
                    continue;
                }
                if let Some(name) = path.file_name().and_then(OsStr::to_str) {
                    programs.insert(name.to_string(), path);
                }
            }
        }
        Self { programs }
    }

    /// Look up the full path of a previously indexed executable.
    pub fn resolve(&self, name: &str) -> Option<&Path> {
        self.programs.get(name).map(PathBuf::as_path)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.programs.contains_key(name)
    }

    /// Iterate over the indexed executable names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.programs.keys().map(String::as_str)
    }
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Run a resolved external program and wait for it to finish.
///
/// Standard input is inherited from the shell; standard output and error go to
/// the provided streams. The child's exit status is not inspected, only its
/// completion is awaited.
pub fn run(
    program: &Path,
    args: &[String],
    out: Box<dyn Stdout>,
    err: Box<dyn Stdout>,
) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(out.stdio())
        .stderr(err.stdio())
        .spawn()
        .with_context(|| format!("failed to start {}", program.display()))?;
    child
        .wait()
        .with_context(|| format!("failed to wait for {}", program.display()))?;
    Ok(())
}
