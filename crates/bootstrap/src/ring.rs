// SPDX-License-Identifier: MIT

//! Ring application-bootstrap protocol: per-child accept, address
//! collect, tree ring-scan, neighbor dispatch.

use spawntree_channel::{Channel, SpawnTree};
use spawntree_collective::{ring_scan, RingEnds};
use spawntree_core::error::{Error, Result};
use spawntree_core::strmap::StrMap;

/// Run the ring protocol against this launcher's locally forked children,
/// resolving their ring neighbors via `tree`'s ring-scan collective.
///
/// `local_children` are the channels accepted from this launcher's own
/// `PPN` forked processes, in local-slot order. `PPN=0` is simply an empty `local_children`.
pub fn run_ring(
    tree: &mut SpawnTree,
    local_children: Vec<Channel>,
    rank: u64,
    ranks: u64,
    ppn: u64,
) -> Result<()> {
    let mut local_children = local_children;

    // Step 1: collect each local child's own address.
    let mut addrs = Vec::with_capacity(local_children.len());
    for child in local_children.iter_mut() {
        let map = child.read_strmap()?;
        let addr = map
            .get("ADDR")
            .ok_or_else(|| Error::protocol("ring: child map missing ADDR"))?
            .to_string();
        addrs.push(addr);
    }

    // Step 2: seed this launcher's own boundary and run the tree-wide scan.
    let seed = if addrs.is_empty() {
        RingEnds::default()
    } else {
        RingEnds::new(Some(addrs[0].clone()), Some(addrs[addrs.len() - 1].clone()))
    };
    let scan = ring_scan(tree, seed)?;

    // Step 3: dispatch each local child's resolved neighbor pair.
    let last = addrs.len().saturating_sub(1);
    for (i, child) in local_children.iter_mut().enumerate() {
        let left = if i == 0 { scan.left.clone() } else { Some(addrs[i - 1].clone()) };
        let right = if i == last { scan.right.clone() } else { Some(addrs[i + 1].clone()) };

        let mut m = StrMap::new();
        m.set("RANK", (rank * ppn + i as u64).to_string());
        m.set("RANKS", (ranks * ppn).to_string());
        if let Some(l) = left {
            m.set("LEFT", l);
        }
        if let Some(r) = right {
            m.set("RIGHT", r);
        }
        child.write_strmap(&m)?;
    }

    // Step 4: disconnect every local child.
    for child in local_children {
        child.disconnect();
    }

    Ok(())
}

#[cfg(test)]
#[path = "ring_tests.rs"]
mod tests;
