// SPDX-License-Identifier: MIT

//! spawntree-collective: broadcast, gather, allgather, ring-scan, and file
//! broadcast — all expressed as synchronous send/recv over the
//! owned channels of a [`spawntree_channel::SpawnTree`]. No background
//! event loop: every collective is one blocking call that returns once the
//! whole tree has participated.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod broadcast;
mod filebcast;
mod gather;
mod ring;
mod signal;

#[cfg(test)]
mod test_support;

pub use broadcast::{broadcast_bytes, broadcast_strmap};
pub use filebcast::file_broadcast;
pub use gather::{allgather_strmap, gather_strmap};
pub use ring::{ring_scan, RingEnds};
pub use signal::{signal_from_root, signal_to_root};
