// SPDX-License-Identifier: MIT

//! `PATH` search for the helper commands named in the parameter strmap.
//! Root resolves each to an absolute path once at startup and writes it
//! back into the parameter strmap so every other launcher inherits the
//! resolved path rather than re-searching `PATH` itself.

use std::path::{Path, PathBuf};

use spawntree_core::error::{Error, Result};

pub const HELPER_COMMANDS: [&str; 6] = ["ssh", "scp", "rsh", "rcp", "sh", "env"];

/// Search `PATH` for `name`, returning its first executable match.
pub fn resolve(name: &str) -> Result<PathBuf> {
    let path_var = std::env::var_os("PATH")
        .ok_or_else(|| Error::config("PATH is not set"))?;
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if is_executable(&candidate) {
            return Ok(candidate);
        }
    }
    Err(Error::config(format!("{name}: not found on PATH")))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0).unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
