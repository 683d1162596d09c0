// SPDX-License-Identifier: MIT

//! Ordered string→string dictionary with a stable pack format.
//!
//! Insertion order is preserved and defines the pack order. `set` on an
//! existing key overwrites the value in place, keeping its original
//! position — this is what lets [`StrMap::merge`] give deterministic,
//! globally-consistent results across an `allgather`.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// An ordered collection of unique string keys, each mapped to a string
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrMap {
    order: Vec<String>,
    values: HashMap<String, String>,
}

impl StrMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`. An existing key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if !self.values.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.values.insert(key, value);
    }

    /// `set` with the value built from a format string, matching the
    /// sprintf-style formatted setters of the original key/value API.
    pub fn set_fmt(&mut self, key: impl Into<String>, value: std::fmt::Arguments<'_>) {
        self.set(key, value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Remove `key`, returning its former value if present.
    pub fn unset(&mut self, key: &str) -> Option<String> {
        let value = self.values.remove(key)?;
        self.order.retain(|k| k != key);
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .map(move |k| (k.as_str(), self.values[k].as_str()))
    }

    /// Merge `other` into `self`, overwriting conflicting keys in place and
    /// appending new keys in `other`'s iteration order.
    pub fn merge(&mut self, other: &StrMap) {
        for (k, v) in other.iter() {
            self.set(k, v);
        }
    }

    /// Exact byte length `pack` will produce.
    pub fn pack_size(&self) -> usize {
        8 + self
            .iter()
            .map(|(k, v)| lp_size(k) + lp_size(v))
            .sum::<usize>()
    }

    /// Serialize to the wire format: a `u64` count, then that many
    /// `(key, value)` pairs, each a `u64` length prefix followed by
    /// NUL-terminated bytes.
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.pack_size());
        buf.extend_from_slice(&(self.len() as u64).to_be_bytes());
        for (k, v) in self.iter() {
            write_lp(&mut buf, k);
            write_lp(&mut buf, v);
        }
        buf
    }

    /// Parse the wire format produced by [`StrMap::pack`].
    pub fn unpack(buf: &[u8]) -> Result<Self> {
        let mut cursor = 0usize;
        let count = read_u64(buf, &mut cursor)?;
        let mut map = StrMap::new();
        for _ in 0..count {
            let key = read_lp(buf, &mut cursor)?;
            let value = read_lp(buf, &mut cursor)?;
            map.set(key, value);
        }
        Ok(map)
    }

    /// Human-readable `key=value` listing, one pair per line.
    pub fn print(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Display for StrMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.print())
    }
}

impl FromIterator<(String, String)> for StrMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = StrMap::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

fn lp_size(s: &str) -> usize {
    8 + s.len() + 1
}

fn write_lp(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u64).to_be_bytes());
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
}

fn read_u64(buf: &[u8], cursor: &mut usize) -> Result<u64> {
    let end = *cursor + 8;
    let slice = buf
        .get(*cursor..end)
        .ok_or_else(|| Error::protocol("strmap: truncated length prefix"))?;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(slice);
    *cursor = end;
    Ok(u64::from_be_bytes(bytes))
}

fn read_lp(buf: &[u8], cursor: &mut usize) -> Result<String> {
    let len = read_u64(buf, cursor)? as usize;
    let end = *cursor + len;
    let body = buf
        .get(*cursor..end)
        .ok_or_else(|| Error::protocol("strmap: truncated value"))?;
    let s = std::str::from_utf8(body)
        .map_err(|_| Error::protocol("strmap: value is not valid UTF-8"))?
        .to_owned();
    *cursor = end;
    let nul = *buf
        .get(end)
        .ok_or_else(|| Error::protocol("strmap: missing NUL terminator"))?;
    if nul != 0 {
        return Err(Error::protocol("strmap: expected NUL terminator"));
    }
    *cursor = end + 1;
    Ok(s)
}

#[cfg(test)]
#[path = "strmap_tests.rs"]
mod tests;
