// SPDX-License-Identifier: MIT

//! spawntree-launcher: the `spawntree` binary's argument parsing,
//! environment contract, process spawning, tree unfurl, and process-group
//! start. `main.rs` is a thin entrypoint over this crate's testable lib.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod cli;
pub mod env;
pub mod group_start;
pub mod logging;
pub mod session;
pub mod spawn;
pub mod unfurl;
pub mod which;

#[cfg(test)]
mod test_support;

pub use session::Session;
