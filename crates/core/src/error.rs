// SPDX-License-Identifier: MIT

//! Error taxonomy shared across the workspace.
//!
//! `Config` errors are the only kind that can be detected before any child
//! is forked; every other kind is fatal to the whole job once the tree
//! exists — there is no partial-failure recovery.

use thiserror::Error;

/// The workspace-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for the launcher and its collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// A required parameter was missing, malformed, or out of range.
    #[error("config: {0}")]
    Config(String),

    /// `fork`/`exec` of a local or remote helper failed.
    #[error("spawn: {0}")]
    Spawn(String),

    /// Channel I/O failed or the peer closed mid-protocol.
    #[error("transport: {0}")]
    Transport(String),

    /// A peer sent a token the state machine did not expect.
    #[error("protocol: {0}")]
    Protocol(String),

    /// Allocation or OS resource limit failure.
    #[error("resource: {0}")]
    Resource(String),

    /// File I/O for file-broadcast or scratch materialization failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The exit-code family for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,
            Error::Spawn(_) => 3,
            Error::Transport(_) => 4,
            Error::Protocol(_) => 5,
            Error::Resource(_) => 6,
            Error::Io(_) => 7,
        }
    }

    /// Short kind tag, used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::Spawn(_) => "spawn",
            Error::Transport(_) => "transport",
            Error::Protocol(_) => "protocol",
            Error::Resource(_) => "resource",
            Error::Io(_) => "io",
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn spawn(msg: impl Into<String>) -> Self {
        Error::Spawn(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Error::Transport(msg.into())
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Error::Protocol(msg.into())
    }
}
