// SPDX-License-Identifier: MIT

//! Session: the root of one launcher process's live state — its
//! endpoint, its spawn tree, the parameter strmap it unfurled with, and the
//! process-group registry populated at group start.

use std::process::Child;

use spawntree_bootstrap::GroupRegistry;
use spawntree_channel::{Endpoint, SpawnTree};
use spawntree_core::params::Parameters;

/// Constructed once per launcher process; dropped once the session's
/// locally forked children have all exited.
pub struct Session {
    pub endpoint: Endpoint,
    pub tree: SpawnTree,
    pub params: Parameters,
    pub groups: GroupRegistry,
    /// Handles this launcher is responsible for waiting on: both the
    /// forked child launchers of §4.F step 2 and the application processes
    /// of §4.H/§4.I group start, combined so step 7's wait loop is a single
    /// pass over one list.
    pub waitable: Vec<Child>,
}

impl Session {
    pub fn new(endpoint: Endpoint, tree: SpawnTree, params: Parameters) -> Self {
        Self {
            endpoint,
            tree,
            params,
            groups: GroupRegistry::new(),
            waitable: Vec::new(),
        }
    }
}
