// SPDX-License-Identifier: MIT

//! Reliable byte-stream channel.
//!
//! Every multi-byte integer on the wire is big-endian. `read`/`write` are
//! blocking and atomic with respect to size: a successful return means
//! exactly the requested number of bytes moved.

use std::io::{Read, Write};
use std::net::TcpStream;

use spawntree_core::error::{Error, Result};
use spawntree_core::strmap::StrMap;

use crate::endpoint::Endpoint;

/// A reliable ordered byte-stream between exactly two endpoints.
/// Exclusively owned by one side at each end; closing either end
/// invalidates both.
pub struct Channel {
    stream: TcpStream,
}

impl Channel {
    /// Dial `name` (an endpoint name as produced by [`Endpoint::name`]).
    pub fn connect(name: &str) -> Result<Self> {
        let addr = name
            .strip_prefix("tcp://")
            .ok_or_else(|| Error::config(format!("invalid endpoint name: {name:?}")))?;
        let stream = TcpStream::connect(addr)
            .map_err(|e| Error::transport(format!("connect to {name} failed: {e}")))?;
        stream.set_nodelay(true).ok();
        Ok(Channel { stream })
    }

    /// Accept one incoming connection on `endpoint`.
    pub fn accept(endpoint: &Endpoint) -> Result<Self> {
        let (stream, _peer) = endpoint
            .listener()
            .accept()
            .map_err(|e| Error::transport(format!("accept failed: {e}")))?;
        stream.set_nodelay(true).ok();
        Ok(Channel { stream })
    }

    /// Close this end. The peer sees subsequent reads/writes fail.
    pub fn disconnect(self) {
        drop(self);
    }

    /// Read exactly `n` bytes.
    pub fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.stream
            .read_exact(&mut buf)
            .map_err(|e| classify_io(e, "read"))?;
        Ok(buf)
    }

    /// Write exactly `bytes.len()` bytes.
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream
            .write_all(bytes)
            .map_err(|e| classify_io(e, "write"))
    }

    /// Read one synchronization byte. The value is ignored.
    pub fn read_byte(&mut self) -> Result<()> {
        self.read(1)?;
        Ok(())
    }

    /// Write one synchronization byte. Any value is acceptable.
    pub fn write_byte(&mut self) -> Result<()> {
        self.write(&[0u8])
    }

    /// Read a `u64` length prefix followed by exactly that many raw bytes.
    /// Used by the collective engine to frame a single `broadcast` payload
    /// on a channel that also carries other message kinds.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_u64()?;
        self.read(len as usize)
    }

    /// Write `bytes` as a `u64` length prefix followed by the raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_u64(bytes.len() as u64)?;
        self.write(bytes)
    }

    /// Read a `u64` length prefix followed by exactly that many raw bytes,
    /// no terminator on the wire.
    pub fn read_str(&mut self) -> Result<String> {
        let len = self.read_u64()?;
        let bytes = self.read(len as usize)?;
        String::from_utf8(bytes).map_err(|_| Error::protocol("string is not valid UTF-8"))
    }

    /// Write `s` as a `u64` length prefix followed by its raw bytes.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_u64(s.len() as u64)?;
        self.write(s.as_bytes())
    }

    /// Read a string-map in the wire pack format, streaming directly
    /// off the channel rather than buffering the whole message first.
    pub fn read_strmap(&mut self) -> Result<StrMap> {
        let count = self.read_u64()?;
        let mut map = StrMap::new();
        for _ in 0..count {
            let key = self.read_lp_string()?;
            let value = self.read_lp_string()?;
            map.set(key, value);
        }
        Ok(map)
    }

    /// Write a string-map in the wire pack format.
    pub fn write_strmap(&mut self, map: &StrMap) -> Result<()> {
        self.write(&map.pack())
    }

    fn read_u64(&mut self) -> Result<u64> {
        let bytes = self.read(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(&bytes);
        Ok(u64::from_be_bytes(arr))
    }

    fn write_u64(&mut self, v: u64) -> Result<()> {
        self.write(&v.to_be_bytes())
    }

    /// Read one `(u64 len, bytes, NUL)` entry as used inside a strmap pack.
    fn read_lp_string(&mut self) -> Result<String> {
        let len = self.read_u64()?;
        let bytes = self.read(len as usize)?;
        let nul = self.read(1)?;
        if nul != [0] {
            return Err(Error::protocol("strmap entry missing NUL terminator"));
        }
        String::from_utf8(bytes).map_err(|_| Error::protocol("strmap entry is not valid UTF-8"))
    }
}

fn classify_io(e: std::io::Error, op: &str) -> Error {
    use std::io::ErrorKind::*;
    match e.kind() {
        ConnectionReset | ConnectionAborted | BrokenPipe | UnexpectedEof => {
            Error::transport(format!("peer closed during {op}"))
        }
        ConnectionRefused => Error::transport(format!("connection refused during {op}")),
        _ => Error::transport(format!("{op} failed: {e}")),
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
