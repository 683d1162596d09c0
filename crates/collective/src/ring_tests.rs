// SPDX-License-Identifier: MIT

use super::*;
use crate::test_support::run_tree;

#[test]
fn three_launchers_ppn_two_ring_closes_correctly() {
    // Addresses a,b,c,d,e,f in rank order, PPN=2 per launcher, so launcher
    // i contributes (addr[2i], addr[2i+1]) as its own (LEFT, RIGHT). Every
    // app rank r should resolve to LEFT = addr[(r-1) mod 6],
    // RIGHT = addr[(r+1) mod 6]; here we check the per-launcher ring_scan
    // output, which supplies the two ends used to seed neighbor addresses
    // for the launcher's own app children.
    let addrs = ["a", "b", "c", "d", "e", "f"];
    let results = run_tree(3, 2, move |tree| {
        let local = RingEnds::new(
            Some(addrs[tree.rank * 2].to_string()),
            Some(addrs[tree.rank * 2 + 1].to_string()),
        );
        (tree.rank, ring_scan(tree, local).unwrap())
    });

    let by_rank: std::collections::HashMap<usize, RingEnds> = results.into_iter().collect();
    // Launcher 0 owns a,b: left neighbor is f (wrap), right neighbor is c.
    assert_eq!(by_rank[&0].left.as_deref(), Some("f"));
    assert_eq!(by_rank[&0].right.as_deref(), Some("c"));
    // Launcher 1 owns c,d: left neighbor is b, right neighbor is e.
    assert_eq!(by_rank[&1].left.as_deref(), Some("b"));
    assert_eq!(by_rank[&1].right.as_deref(), Some("e"));
    // Launcher 2 owns e,f: left neighbor is d, right neighbor is a (wrap).
    assert_eq!(by_rank[&2].left.as_deref(), Some("d"));
    assert_eq!(by_rank[&2].right.as_deref(), Some("a"));
}

#[test]
fn single_launcher_ring_wraps_to_itself() {
    let results = run_tree(1, 2, |tree| {
        let local = RingEnds::new(Some("only-left".to_string()), Some("only-right".to_string()));
        ring_scan(tree, local).unwrap()
    });
    assert_eq!(results[0].left.as_deref(), Some("only-right"));
    assert_eq!(results[0].right.as_deref(), Some("only-left"));
}

#[test]
fn empty_subtree_slots_propagate_through_the_scan() {
    // Launcher 1 contributes no addresses at all (the PPN=0 case: empty
    // slots propagate through the scan rather than being special-cased).
    // Its own neighbors still resolve correctly from its immediate
    // siblings' local addresses, while ranks on the far side of the empty
    // launcher see the empty slot rather than a value skipped past it.
    let results = run_tree(3, 3, |tree| {
        let local = if tree.rank == 1 {
            RingEnds::default()
        } else {
            RingEnds::new(Some(format!("L{}", tree.rank)), Some(format!("R{}", tree.rank)))
        };
        (tree.rank, ring_scan(tree, local).unwrap())
    });
    let by_rank: std::collections::HashMap<usize, RingEnds> = results.into_iter().collect();
    // The empty launcher still gets correct neighbors from its siblings.
    assert_eq!(by_rank[&1].left.as_deref(), Some("R0"));
    assert_eq!(by_rank[&1].right.as_deref(), Some("L2"));
    // The far side of the empty launcher sees the propagated empty slot.
    assert_eq!(by_rank[&0].right, None);
    assert_eq!(by_rank[&2].left, None);
}
