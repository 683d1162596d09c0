// SPDX-License-Identifier: MIT

//! Environment-variable contract: `MV2_SPAWN_*` inputs read at
//! root, and the parent/id pair every forked non-root reads. The
//! variables exported down to application processes live in
//! `group_start`, which is their only writer and reader.

use spawntree_core::error::{Error, Result};

const NET: &str = "MV2_SPAWN_NET";
const DEGREE: &str = "MV2_SPAWN_DEGREE";
const SH: &str = "MV2_SPAWN_SH";
const LOCAL: &str = "MV2_SPAWN_LOCAL";
const COPY: &str = "MV2_SPAWN_COPY";
const DBG: &str = "MV2_SPAWN_DBG";
const EXE: &str = "MV2_SPAWN_EXE";
const PPN: &str = "MV2_SPAWN_PPN";
const PMI: &str = "MV2_SPAWN_PMI";
const RING: &str = "MV2_SPAWN_RING";
const FIFO: &str = "MV2_SPAWN_FIFO";
const BCAST_BIN: &str = "MV2_SPAWN_BCAST_BIN";

const PARENT: &str = "MV2_SPAWN_PARENT";
const ID: &str = "MV2_SPAWN_ID";

/// Root-only configuration, read from the environment before any child is
/// forked. Unset values take the defaults noted per field;
/// invalid values are `Error::Config`.
#[derive(Debug, Clone)]
pub struct RootEnv {
    pub net: String,
    pub degree: u64,
    pub sh: String,
    pub local: String,
    pub copy: bool,
    pub dbg: Option<String>,
    pub exe: Option<String>,
    pub ppn: u64,
    pub pmi: bool,
    pub ring: bool,
    pub fifo: bool,
    pub bcast_bin: bool,
}

impl RootEnv {
    /// Read every `MV2_SPAWN_*` root variable, applying the documented
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            net: env_or(NET, "tcp"),
            degree: env_u64_or(DEGREE, 2)?,
            sh: env_or(SH, "ssh"),
            local: env_or(LOCAL, "direct"),
            copy: env_bool_or(COPY, false)?,
            dbg: std::env::var(DBG).ok(),
            exe: std::env::var(EXE).ok(),
            ppn: env_u64_or(PPN, 1)?,
            pmi: env_bool_or(PMI, true)?,
            ring: env_bool_or(RING, false)?,
            fifo: env_bool_or(FIFO, false)?,
            bcast_bin: env_bool_or(BCAST_BIN, false)?,
        })
    }
}

/// `MV2_SPAWN_PARENT`/`MV2_SPAWN_ID`, required and set by the parent
/// launcher on every forked non-root process.
#[derive(Debug, Clone)]
pub struct NonRootEnv {
    pub parent_endpoint: String,
    pub id: usize,
}

impl NonRootEnv {
    /// Read the parent/id pair. Returns `Ok(None)` when neither is set
    /// (this process is root); `Err` if only one is set, or `ID` does not
    /// parse.
    pub fn from_env() -> Result<Option<Self>> {
        let parent = std::env::var(PARENT).ok();
        let id = std::env::var(ID).ok();
        match (parent, id) {
            (None, None) => Ok(None),
            (Some(parent_endpoint), Some(id)) => {
                let id = id
                    .parse()
                    .map_err(|_| Error::config(format!("{ID}: expected an integer, got {id:?}")))?;
                Ok(Some(Self { parent_endpoint, id }))
            }
            _ => Err(Error::config(format!("{PARENT} and {ID} must be set together"))),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_u64_or(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(v) => v.parse().map_err(|_| Error::config(format!("{key}: expected an integer, got {v:?}"))),
    }
}

fn env_bool_or(key: &str, default: bool) -> Result<bool> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(v) if v == "1" => Ok(true),
        Ok(v) if v == "0" => Ok(false),
        Ok(v) => Err(Error::config(format!("{key}: expected 0 or 1, got {v:?}"))),
    }
}
