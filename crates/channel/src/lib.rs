// SPDX-License-Identifier: MIT

//! spawntree-channel: the reliable byte-stream endpoint abstraction and
//! the spawn-tree node that owns a launcher's parent/children channels.
//!
//! Transport is `std::net`, blocking, single-threaded: the launcher's
//! control flow is one logical thread per process synchronizing over
//! blocking I/O, so there is no event loop or cross-task state for an
//! async runtime to coordinate here.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod channel;
mod endpoint;
mod spawn_tree;

pub use channel::Channel;
pub use endpoint::{Endpoint, TransportKind};
pub use spawn_tree::{ChildLink, SpawnTree};
