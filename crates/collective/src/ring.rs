// SPDX-License-Identifier: MIT

//! Ring-scan: every launcher learns the ring address of its left and
//! right neighbor in the flattened "launcher, then its children's
//! subtrees" ordering, without any rank knowing the full ring.
//!
//! Two passes over the same tree:
//!
//! - Upward, each node combines its own addresses with what its children
//!   already combined, filling gaps left by empty subtrees, and hands the
//!   combined pair to its parent.
//! - Downward, the root closes the ring on itself, and each node splits its
//!   inherited boundary between its own position and each child in turn.

use spawntree_channel::SpawnTree;
use spawntree_core::error::Result;
use spawntree_core::strmap::StrMap;

const LEFT: &str = "LEFT";
const RIGHT: &str = "RIGHT";

/// A launcher's ring neighbor addresses. `None` means "no address on this
/// side", which is the normal state for a tree with only one launcher, or
/// while a subtree has not yet contributed any address at all.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RingEnds {
    pub left: Option<String>,
    pub right: Option<String>,
}

impl RingEnds {
    pub fn new(left: impl Into<Option<String>>, right: impl Into<Option<String>>) -> Self {
        Self { left: left.into(), right: right.into() }
    }

    fn to_strmap(&self) -> StrMap {
        let mut map = StrMap::new();
        if let Some(l) = &self.left {
            map.set(LEFT, l);
        }
        if let Some(r) = &self.right {
            map.set(RIGHT, r);
        }
        map
    }

    fn from_strmap(map: &StrMap) -> Self {
        Self {
            left: map.get(LEFT).map(str::to_string),
            right: map.get(RIGHT).map(str::to_string),
        }
    }
}

/// First non-empty address scanning `candidates` in order.
fn first_some(candidates: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    candidates.into_iter().flatten().next()
}

/// Run a ring-scan over `tree`, contributing `local` as this launcher's own
/// addresses, and return this launcher's resolved left/right neighbors.
pub fn ring_scan(tree: &mut SpawnTree, local: RingEnds) -> Result<RingEnds> {
    // Upward: collect each child's combined pair, then fold in our own.
    let mut child_upward = Vec::with_capacity(tree.children.len());
    for child in tree.children.iter_mut() {
        let map = child.channel.read_strmap()?;
        child_upward.push(RingEnds::from_strmap(&map));
    }

    let combined_left = first_some(
        std::iter::once(local.left.clone())
            .chain(child_upward.iter().map(|c| c.left.clone())),
    );
    let combined_right = first_some(
        child_upward
            .iter()
            .rev()
            .map(|c| c.right.clone())
            .chain(std::iter::once(local.right.clone())),
    );
    let combined = RingEnds::new(combined_left, combined_right);

    if let Some(parent) = tree.parent.as_mut() {
        parent.write_strmap(&combined.to_strmap())?;
    }

    // Downward: the root closes the ring on itself; everyone else inherits
    // its boundary from its parent.
    let downward_in = if let Some(parent) = tree.parent.as_mut() {
        RingEnds::from_strmap(&parent.read_strmap()?)
    } else {
        RingEnds::new(combined.right.clone(), combined.left.clone())
    };

    let own_right = if tree.children.is_empty() {
        downward_in.right.clone()
    } else {
        child_upward[0].left.clone()
    };
    let resolved = RingEnds::new(downward_in.left.clone(), own_right);

    let last = tree.children.len().saturating_sub(1);
    for (i, child) in tree.children.iter_mut().enumerate() {
        let child_left = if i == 0 {
            local.right.clone()
        } else {
            child_upward[i - 1].right.clone()
        };
        let child_right = if i == last {
            downward_in.right.clone()
        } else {
            child_upward[i + 1].left.clone()
        };
        let out = RingEnds::new(child_left, child_right);
        child.channel.write_strmap(&out.to_strmap())?;
    }

    Ok(resolved)
}

#[cfg(test)]
#[path = "ring_tests.rs"]
mod tests;
