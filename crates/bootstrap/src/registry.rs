// SPDX-License-Identifier: MIT

//! Process-group registry: two indexes on the session, `name → group`
//! and `pid → name`, both populated at group start. Lookup by pid is
//! what a future reaper uses to map a `SIGCHLD` to its owning group;
//! group destroy deletes both mappings.

use std::collections::HashMap;

use spawntree_core::error::{Error, Result};
use spawntree_core::params::Parameters;

/// A set of application processes started together under one name within
/// a session.
#[derive(Debug, Clone)]
pub struct ProcessGroup {
    pub name: String,
    pub params: Parameters,
    pub count: u64,
    pub pids: Vec<u32>,
}

/// `name → group` and `pid → name` indexes, owned by the session.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    by_name: HashMap<String, ProcessGroup>,
    by_pid: HashMap<u32, String>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly started group. Fails if `name` is already in use.
    pub fn start(
        &mut self,
        name: impl Into<String>,
        params: Parameters,
        pids: Vec<u32>,
    ) -> Result<()> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(Error::config(format!("process group {name:?} already started")));
        }
        for &pid in &pids {
            self.by_pid.insert(pid, name.clone());
        }
        let count = pids.len() as u64;
        self.by_name.insert(name.clone(), ProcessGroup { name, params, count, pids });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ProcessGroup> {
        self.by_name.get(name)
    }

    /// The group owning `pid`, used by the SIGCHLD reaper to find which
    /// group a terminated local process belonged to.
    pub fn group_for_pid(&self, pid: u32) -> Option<&ProcessGroup> {
        self.by_pid.get(&pid).and_then(|name| self.by_name.get(name))
    }

    /// Tear down a group, deleting both the name and pid mappings.
    pub fn finalize(&mut self, name: &str) -> Option<ProcessGroup> {
        let group = self.by_name.remove(name)?;
        for &pid in &group.pids {
            self.by_pid.remove(&pid);
        }
        Some(group)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
