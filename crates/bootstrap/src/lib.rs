// SPDX-License-Identifier: MIT

//! spawntree-bootstrap: the two application-bootstrap state machines that
//! run between a launcher and the application processes it forked (spec
//! §4.H, §4.I), plus the process-group registry that indexes them on the
//! launcher's session.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod pmi;
mod registry;
mod ring;

#[cfg(test)]
mod test_support;

pub use pmi::run_pmi;
pub use registry::{GroupRegistry, ProcessGroup};
pub use ring::run_ring;
