// SPDX-License-Identifier: MIT

use super::*;
use crate::test_support::run_tree;

#[test]
fn signal_to_root_then_from_root_completes_for_every_rank() {
    let results = run_tree(7, 2, |tree| {
        signal_to_root(tree).unwrap();
        signal_from_root(tree).unwrap();
        tree.rank
    });
    assert_eq!(results, vec![0, 1, 2, 3, 4, 5, 6]);
}

#[test]
fn single_rank_tree_signals_trivially() {
    let results = run_tree(1, 2, |tree| {
        signal_to_root(tree).unwrap();
        signal_from_root(tree).unwrap();
        tree.rank
    });
    assert_eq!(results, vec![0]);
}
