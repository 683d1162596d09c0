// SPDX-License-Identifier: MIT

//! Gather and allgather over string-maps.

use spawntree_channel::SpawnTree;
use spawntree_core::error::Result;
use spawntree_core::strmap::StrMap;

use crate::broadcast::broadcast_strmap;

/// Every non-leaf reads and merges (overwriting on conflict) a strmap from
/// each child in order, then writes the merged result to its parent. Root
/// produces the complete result; every other rank returns only the merge
/// of its own subtree.
pub fn gather_strmap(tree: &mut SpawnTree, local: StrMap) -> Result<StrMap> {
    let mut merged = local;
    for child in tree.children.iter_mut() {
        let child_map = child.channel.read_strmap()?;
        merged.merge(&child_map);
    }
    if let Some(parent) = tree.parent.as_mut() {
        parent.write_strmap(&merged)?;
    }
    Ok(merged)
}

/// `gather_strmap` followed by `broadcast_strmap`: every launcher ends
/// holding the merge of every launcher's input, in a globally consistent
/// order.
pub fn allgather_strmap(tree: &mut SpawnTree, local: StrMap) -> Result<StrMap> {
    let subtree_merge = gather_strmap(tree, local)?;
    let root_input = tree.is_root().then_some(subtree_merge);
    broadcast_strmap(tree, root_input)
}

#[cfg(test)]
#[path = "gather_tests.rs"]
mod tests;
