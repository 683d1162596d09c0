// SPDX-License-Identifier: MIT

use std::thread;

use super::*;
use crate::test_support::{app_channel_pair, run_tree};
use spawntree_core::error::Error;

/// Drive the application side of one PMI channel: commit `pairs`, wait for
/// BARRIER, issue the two GET rounds for `gets`, then FINALIZE. Returns the
/// values received for each key in `gets`, in order.
fn app_side(mut app: Channel, pairs: Vec<(String, String)>, gets: Vec<String>) -> Vec<String> {
    let _init = app.read_strmap().expect("initial assignment");

    let mut commit = StrMap::new();
    for (k, v) in &pairs {
        commit.set(k.clone(), v.clone());
    }
    app.write_str("BARRIER").expect("announce barrier");
    app.write_strmap(&commit).expect("commit map");

    let barrier = app.read_str().expect("barrier release");
    assert_eq!(barrier, "BARRIER");

    let mut got = Vec::with_capacity(gets.len() * 2);
    for _round in 0..2 {
        for key in &gets {
            app.write_str("GET").expect("get token");
            app.write_str(key).expect("get key");
            got.push(app.read_str().expect("get value"));
        }
    }

    app.write_str("FINALIZE").expect("finalize");
    got
}

#[test]
fn four_ranks_one_get_each_receives_the_owning_ranks_value() {
    // Each rank i commits its own key K_i=v_i, PPN=1; after the barrier
    // every app child can GET any other rank's key and receive exactly
    // what that rank committed.
    let results = run_tree(4, 2, |tree| {
        let (launcher_side, app_side_chan) = app_channel_pair();
        let rank = tree.rank as u64;
        let pairs = vec![(format!("K_{rank}"), format!("v{rank}"))];
        let gets: Vec<String> = (0..4).map(|i| format!("K_{i}")).collect();
        let app = thread::spawn(move || app_side(app_side_chan, pairs, gets));
        run_pmi(tree, vec![launcher_side], rank, 4, 1).unwrap();
        app.join().expect("app thread")
    });
    for got in results {
        // Two rounds of the same four GETs; both rounds see the same
        // globally converged map.
        let expected: Vec<String> =
            (0..4).map(|i| format!("v{i}")).chain((0..4).map(|i| format!("v{i}"))).collect();
        assert_eq!(got, expected);
    }
}

#[test]
fn get_of_unknown_key_returns_empty_string() {
    let results = run_tree(2, 2, |tree| {
        let (launcher_side, app_side_chan) = app_channel_pair();
        let app = thread::spawn(move || {
            app_side(app_side_chan, Vec::new(), vec!["NOPE".to_string()])
        });
        run_pmi(tree, vec![launcher_side], tree.rank as u64, 2, 1).unwrap();
        app.join().expect("app thread")
    });
    for got in results {
        assert_eq!(got, vec!["".to_string(), "".to_string()]);
    }
}

#[test]
fn get_before_barrier_is_a_protocol_error() {
    let (launcher_side, mut app) = app_channel_pair();
    // Read the initial assignment so the test fixture behaves like a real
    // child up through step 1, then violate the protocol by sending GET
    // before committing BARRIER.
    let app_thread = thread::spawn(move || {
        let _init = app.read_strmap().unwrap();
        app.write_str("GET").unwrap();
    });
    // A single-rank tree has no parent and no peers, so allgather never
    // blocks past this launcher's own contribution; the failure must come
    // from the protocol check in step 2 instead.
    let mut single = SpawnTree::new(0, 1);
    let err = run_pmi(&mut single, vec![launcher_side], 0, 1, 1);
    app_thread.join().unwrap();
    assert!(matches!(err, Err(Error::Protocol(_))));
}
