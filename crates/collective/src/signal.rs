// SPDX-License-Identifier: MIT

//! Up-tree and down-tree one-byte synchronization waves.
//! These bytes carry no data; they give a barrier pair whose round-trip
//! cost is `2·height` hops, used to delimit timed phases during unfurl.

use spawntree_channel::SpawnTree;
use spawntree_core::error::Result;

/// Each non-leaf reads one byte from every child, then writes one byte to
/// its parent. A leaf just writes to its parent. Returns at the root once
/// every launcher has entered the phase.
pub fn signal_to_root(tree: &mut SpawnTree) -> Result<()> {
    for child in tree.children.iter_mut() {
        child.channel.read_byte()?;
    }
    if let Some(parent) = tree.parent.as_mut() {
        parent.write_byte()?;
    }
    Ok(())
}

/// Each non-root reads one byte from its parent, then writes one byte to
/// every child. Root only writes. Returns at every leaf once the whole
/// tree has exited the gate.
pub fn signal_from_root(tree: &mut SpawnTree) -> Result<()> {
    if let Some(parent) = tree.parent.as_mut() {
        parent.read_byte()?;
    }
    for child in tree.children.iter_mut() {
        child.channel.write_byte()?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
