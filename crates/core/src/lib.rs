// SPDX-License-Identifier: MIT

//! spawntree-core: data model and pure algorithms shared by every crate in
//! the workspace — the string-map wire type, k-ary tree arithmetic, typed
//! parameter access, the error taxonomy, and the MPIR-style debugger table.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod debugger;
pub mod error;
pub mod params;
pub mod strmap;
pub mod tree;

pub use error::{Error, Result};
pub use params::Parameters;
pub use strmap::StrMap;
pub use tree::TreeNode;
