// SPDX-License-Identifier: MIT

//! k-ary tree arithmetic. Pure function, no I/O.
//!
//! The level-packing recurrence for a k-ary tree (level sizes
//! `1, k, k², …`) telescopes to the familiar array-backed indexing used
//! here — `parent(r) = (r-1) / k`, `children(r) = [r*k+1, r*k+k]` clipped
//! to `ranks` — which is what this module computes directly.

use crate::error::{Error, Result};

/// A rank's position in the tree: its parent (`None` only for rank 0) and
/// its ordered, contiguous list of children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub rank: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl TreeNode {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Compute `rank`'s parent and children for a job of `ranks` launchers with
/// fan-out `k`.
///
/// `ranks` must be at least 1 and `rank` must be in `0..ranks`. `k` must be
/// at least 2: `k == 1` would degenerate into a pathological linear chain,
/// so this implementation rejects it as `Error::Config` instead.
pub fn tree(rank: usize, ranks: usize, k: usize) -> Result<TreeNode> {
    if k < 2 {
        return Err(Error::config(format!("tree fan-out must be >= 2, got {k}")));
    }
    if ranks == 0 {
        return Err(Error::config("tree must have at least one rank"));
    }
    if rank >= ranks {
        return Err(Error::config(format!("rank {rank} out of range 0..{ranks}")));
    }

    let parent = if rank == 0 { None } else { Some((rank - 1) / k) };

    let first_child = rank * k + 1;
    let children = if first_child >= ranks {
        Vec::new()
    } else {
        let last = (first_child + k).min(ranks);
        (first_child..last).collect()
    };

    Ok(TreeNode { rank, parent, children })
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
