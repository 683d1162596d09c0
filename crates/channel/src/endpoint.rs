// SPDX-License-Identifier: MIT

//! Local listener abstraction.

use std::net::TcpListener;
use std::str::FromStr;

use spawntree_core::error::{Error, Result};

/// Transport kind, selected by `MV2_SPAWN_NET` at root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Tcp,
    /// InfiniBand unreliable datagram. Accepted as a configuration value
    /// so argument validation matches the external contract, but opening
    /// one is a `Config` error in this build: no IB transport is wired up.
    Ibud,
}

impl FromStr for TransportKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tcp" => Ok(TransportKind::Tcp),
            "ibud" => Ok(TransportKind::Ibud),
            other => Err(Error::config(format!(
                "MV2_SPAWN_NET: invalid transport {other:?}"
            ))),
        }
    }
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TransportKind::Tcp => "tcp",
            TransportKind::Ibud => "ibud",
        })
    }
}

/// A local listener identified by a printable, opaque name that encodes
/// its transport kind so `connect` can dispatch on it.
pub struct Endpoint {
    kind: TransportKind,
    name: String,
    listener: Option<TcpListener>,
}

impl Endpoint {
    /// Open a new endpoint of the given transport kind, bound to an
    /// OS-assigned port on all local interfaces.
    pub fn open(kind: TransportKind) -> Result<Self> {
        match kind {
            TransportKind::Tcp => {
                let listener = TcpListener::bind(("0.0.0.0", 0))
                    .map_err(|e| Error::transport(format!("failed to open endpoint: {e}")))?;
                let addr = listener
                    .local_addr()
                    .map_err(|e| Error::transport(format!("failed to read local addr: {e}")))?;
                let host = local_hostname();
                let name = format!("tcp://{host}:{}", addr.port());
                Ok(Endpoint { kind, name, listener: Some(listener) })
            }
            TransportKind::Ibud => Err(Error::config(
                "ibud transport not available in this build",
            )),
        }
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    /// The printable, opaque name other launchers `connect` to.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn listener(&self) -> &TcpListener {
        self.listener
            .as_ref()
            .unwrap_or_else(|| unreachable!("endpoint without a listener"))
    }

    /// Close the endpoint. No more `accept`s will succeed afterward.
    pub fn close(self) {
        drop(self);
    }
}

fn local_hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| {
            std::process::Command::new("hostname")
                .output()
                .ok()
                .and_then(|o| String::from_utf8(o.stdout).ok())
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "localhost".to_string())
}
