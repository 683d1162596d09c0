// SPDX-License-Identifier: MIT

//! Spawn-tree node: a launcher's own rank, its parent channel (if any),
//! and its ordered child links. Channels are exclusively owned here; the
//! collective engine borrows this structure to drive its traversal, it
//! never owns the channels itself.

use crate::channel::Channel;

/// One local child: its global rank, the channel to it, and the bookkeeping
/// the launcher needs once it has forked that child.
pub struct ChildLink {
    pub rank: usize,
    pub channel: Channel,
    pub hostname: String,
    pub pid: Option<u32>,
}

/// Root of the live tree state local to one launcher process.
pub struct SpawnTree {
    pub rank: usize,
    pub ranks: usize,
    pub parent: Option<Channel>,
    pub children: Vec<ChildLink>,
}

impl SpawnTree {
    pub fn new(rank: usize, ranks: usize) -> Self {
        Self { rank, ranks, parent: None, children: Vec::new() }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Find the child slot for `rank`, used by the unfurl handshake to
    /// place an accepted channel by its `ID` field rather than accept
    /// order.
    pub fn child_slot(&self, rank: usize) -> Option<usize> {
        self.children.iter().position(|c| c.rank == rank)
    }
}
