// SPDX-License-Identifier: MIT

//! Tree broadcast: every non-root first reads from its parent, then
//! writes to each child in list order. Root only writes.

use spawntree_channel::SpawnTree;
use spawntree_core::error::{Error, Result};
use spawntree_core::strmap::StrMap;

/// Broadcast raw bytes. Root must supply `local`; every other rank passes
/// `None` and receives the broadcast value as the return.
pub fn broadcast_bytes(tree: &mut SpawnTree, local: Option<Vec<u8>>) -> Result<Vec<u8>> {
    let payload = if let Some(parent) = tree.parent.as_mut() {
        parent.read_bytes()?
    } else {
        local.ok_or_else(|| Error::config("root must supply a broadcast payload"))?
    };
    for child in tree.children.iter_mut() {
        child.channel.write_bytes(&payload)?;
    }
    Ok(payload)
}

/// Broadcast a string-map, used directly by file-broadcast parameter
/// propagation and as the second half of [`crate::allgather_strmap`].
pub fn broadcast_strmap(tree: &mut SpawnTree, local: Option<StrMap>) -> Result<StrMap> {
    let map = if let Some(parent) = tree.parent.as_mut() {
        parent.read_strmap()?
    } else {
        local.ok_or_else(|| Error::config("root must supply a broadcast strmap"))?
    };
    for child in tree.children.iter_mut() {
        child.channel.write_strmap(&map)?;
    }
    Ok(map)
}

#[cfg(test)]
#[path = "broadcast_tests.rs"]
mod tests;
