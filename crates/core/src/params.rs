// SPDX-License-Identifier: MIT

//! Typed accessors over the parameter string-map.
//!
//! Everything still travels the wire as strings; `Parameters` only parses
//! on read and surfaces `Error::Config` early, naming the offending key.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::strmap::StrMap;

/// Wraps a [`StrMap`] with typed accessors for the recognized parameter
/// keys.
#[derive(Debug, Clone, Default)]
pub struct Parameters(StrMap);

/// Remote shell kind (`SH` parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteShell {
    Rsh,
    Ssh,
}

/// Local launch kind (`LOCAL` parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalLaunch {
    Shell,
    Direct,
}

/// Debugger-attach mode (`MPIR` parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugMode {
    Unset,
    Spawn,
    App,
}

impl FromStr for RemoteShell {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rsh" => Ok(RemoteShell::Rsh),
            "ssh" => Ok(RemoteShell::Ssh),
            other => Err(Error::config(format!("SH: invalid remote shell {other:?}"))),
        }
    }
}

impl FromStr for LocalLaunch {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "shell" => Ok(LocalLaunch::Shell),
            "direct" => Ok(LocalLaunch::Direct),
            other => Err(Error::config(format!("LOCAL: invalid launch kind {other:?}"))),
        }
    }
}

impl FromStr for DebugMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "unset" | "" => Ok(DebugMode::Unset),
            "spawn" => Ok(DebugMode::Spawn),
            "app" => Ok(DebugMode::App),
            other => Err(Error::config(format!("MPIR: invalid debug mode {other:?}"))),
        }
    }
}

impl Parameters {
    pub fn new() -> Self {
        Self(StrMap::new())
    }

    pub fn from_strmap(map: StrMap) -> Self {
        Self(map)
    }

    pub fn as_strmap(&self) -> &StrMap {
        &self.0
    }

    pub fn into_strmap(self) -> StrMap {
        self.0
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.set(key, value);
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key)
    }

    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.0
            .get(key)
            .ok_or_else(|| Error::config(format!("missing required parameter {key}")))
    }

    pub fn get_u64(&self, key: &str) -> Result<u64> {
        self.require_str(key)?
            .parse()
            .map_err(|_| Error::config(format!("{key}: expected an integer")))
    }

    pub fn get_u64_or(&self, key: &str, default: u64) -> Result<u64> {
        match self.0.get(key) {
            Some(v) => v
                .parse()
                .map_err(|_| Error::config(format!("{key}: expected an integer"))),
            None => Ok(default),
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        match self.require_str(key)? {
            "1" => Ok(true),
            "0" => Ok(false),
            other => Err(Error::config(format!("{key}: expected 0 or 1, got {other:?}"))),
        }
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.0.get(key) {
            None => Ok(default),
            Some("1") => Ok(true),
            Some("0") => Ok(false),
            Some(other) => Err(Error::config(format!("{key}: expected 0 or 1, got {other:?}"))),
        }
    }

    pub fn get_path(&self, key: &str) -> Result<PathBuf> {
        Ok(Path::new(self.require_str(key)?).to_path_buf())
    }

    pub fn host(&self, rank: usize) -> Result<&str> {
        self.require_str(&rank.to_string())
    }

    pub fn set_host(&mut self, rank: usize, host: impl Into<String>) {
        self.set(rank.to_string(), host);
    }

    pub fn remote_shell(&self) -> Result<RemoteShell> {
        self.require_str("SH")?.parse()
    }

    pub fn local_launch(&self) -> Result<LocalLaunch> {
        self.require_str("LOCAL")?.parse()
    }

    pub fn debug_mode(&self) -> Result<DebugMode> {
        self.0.get("MPIR").unwrap_or("unset").parse()
    }
}
