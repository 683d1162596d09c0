// SPDX-License-Identifier: MIT

//! PMI application-bootstrap protocol: per-child accept, init strmap,
//! barrier, two GET rounds, finalize.
//!
//! Ordering invariant: a child must not issue `GET` before receiving
//! `BARRIER`, and the launcher must not reply to `GET` until its own
//! allgather has completed. Both fall out of doing step 2 (collect every
//! local child's committed map) fully, for every channel, before starting
//! step 3's allgather — a channel that violates the sequence is caught
//! and turned into a protocol error before any other local child sees a
//! `BARRIER`.

use spawntree_channel::{Channel, SpawnTree};
use spawntree_collective::allgather_strmap;
use spawntree_core::error::{Error, Result};
use spawntree_core::strmap::StrMap;

const BARRIER: &str = "BARRIER";
const GET: &str = "GET";
const FINALIZE: &str = "FINALIZE";
const GET_ROUNDS: usize = 2;

/// Run the PMI protocol against this launcher's locally forked children,
/// synchronizing with every other launcher via `tree`'s allgather.
///
/// `local_children` are the channels accepted from this launcher's own
/// `PPN` forked processes, in local-slot order. On success every channel
/// has been driven through FINALIZE and disconnected.
pub fn run_pmi(
    tree: &mut SpawnTree,
    local_children: Vec<Channel>,
    rank: u64,
    ranks: u64,
    ppn: u64,
) -> Result<()> {
    let mut local_children = local_children;

    // Step 1: launcher -> child initial assignment.
    for (i, child) in local_children.iter_mut().enumerate() {
        let mut m = StrMap::new();
        m.set("RANK", (rank * ppn + i as u64).to_string());
        m.set("RANKS", (ranks * ppn).to_string());
        m.set("JOBID", "0");
        child.write_strmap(&m)?;
    }

    // Step 2: collect BARRIER + committed strmap from every local child
    // before any of them is released, so a protocol violation on one
    // channel never lets a sibling channel see BARRIER.
    let mut committed = StrMap::new();
    for child in local_children.iter_mut() {
        let token = child.read_str()?;
        if token != BARRIER {
            return Err(Error::protocol(format!(
                "pmi: expected {BARRIER:?} before commit, got {token:?}"
            )));
        }
        let map = child.read_strmap()?;
        committed.merge(&map);
    }

    // Step 3: the job-wide barrier.
    let global = allgather_strmap(tree, committed)?;

    // Step 4: release every local child.
    for child in local_children.iter_mut() {
        child.write_str(BARRIER)?;
    }

    // Step 5: two GET rounds.
    for _ in 0..GET_ROUNDS {
        for child in local_children.iter_mut() {
            let token = child.read_str()?;
            if token != GET {
                return Err(Error::protocol(format!("pmi: expected {GET:?}, got {token:?}")));
            }
            let key = child.read_str()?;
            let value = global.get(&key).unwrap_or("");
            child.write_str(value)?;
        }
    }

    // Step 6: FINALIZE then disconnect.
    for mut child in local_children {
        let token = child.read_str()?;
        if token != FINALIZE {
            return Err(Error::protocol(format!(
                "pmi: expected {FINALIZE:?}, got {token:?}"
            )));
        }
        child.disconnect();
    }

    Ok(())
}

#[cfg(test)]
#[path = "pmi_tests.rs"]
mod tests;
