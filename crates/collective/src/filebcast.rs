// SPDX-License-Identifier: MIT

//! File broadcast: root reads a file into memory, tree-broadcasts
//! `(size, bytes)`, and every launcher materializes the bytes under a
//! scratch path derived from the file's basename.

use std::path::{Path, PathBuf};

use spawntree_channel::SpawnTree;
use spawntree_core::error::{Error, Result};

use crate::broadcast::broadcast_bytes;

/// Broadcast the file at `path` (meaningful only at the root; ignored
/// elsewhere) and materialize it under `scratch_dir` on every launcher.
/// Returns the scratch path each launcher wrote to.
///
/// The whole file is read into memory at the root; chunked streaming is a
/// permitted but unneeded optimization here.
pub fn file_broadcast(
    tree: &mut SpawnTree,
    path: Option<&Path>,
    scratch_dir: &Path,
) -> Result<PathBuf> {
    let basename = if tree.is_root() {
        let path = path.ok_or_else(|| Error::config("root must supply a file-broadcast path"))?;
        path.file_name()
            .ok_or_else(|| Error::config("file-broadcast path has no file name"))?
            .to_string_lossy()
            .into_owned()
    } else {
        String::new()
    };

    let local = if tree.is_root() {
        let path = path.ok_or_else(|| Error::config("root must supply a file-broadcast path"))?;
        let contents = std::fs::read(path)?;
        let mut buf = Vec::with_capacity(8 + basename.len() + contents.len());
        buf.extend_from_slice(&(basename.len() as u64).to_be_bytes());
        buf.extend_from_slice(basename.as_bytes());
        buf.extend_from_slice(&contents);
        Some(buf)
    } else {
        None
    };

    let payload = broadcast_bytes(tree, local)?;
    let name_len = u64::from_be_bytes(
        payload[0..8]
            .try_into()
            .map_err(|_| Error::protocol("file-broadcast: truncated name length"))?,
    ) as usize;
    let name = std::str::from_utf8(&payload[8..8 + name_len])
        .map_err(|_| Error::protocol("file-broadcast: name is not valid UTF-8"))?;
    let contents = &payload[8 + name_len..];

    std::fs::create_dir_all(scratch_dir)?;
    let dest = scratch_dir.join(name);
    std::fs::write(&dest, contents)?;
    Ok(dest)
}

#[cfg(test)]
#[path = "filebcast_tests.rs"]
mod tests;
