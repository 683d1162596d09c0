// SPDX-License-Identifier: MIT

//! Builds a real, TCP-backed spawn tree across OS threads, the same way
//! `spawntree-collective`'s test support does, plus a way to open local
//! "application child" channel pairs on each launcher thread so PMI/ring
//! tests can drive both sides of the protocol with real channel I/O.

use std::thread;

use spawntree_channel::{Channel, ChildLink, Endpoint, SpawnTree, TransportKind};
use spawntree_core::tree::tree as topology;

/// One local app-child's two ends: the launcher's accepted channel and the
/// test-side channel standing in for the forked application process.
pub fn app_channel_pair() -> (Channel, Channel) {
    let endpoint = Endpoint::open(TransportKind::Tcp).expect("open endpoint");
    let name = endpoint.name().to_string();
    let launcher_side = thread::spawn(move || Channel::accept(&endpoint).expect("accept"));
    let app_side = Channel::connect(&name).expect("connect");
    (launcher_side.join().expect("accept thread"), app_side)
}

/// Run `body` once per rank of a `(ranks, k)` tree, each on its own thread,
/// wired together with real TCP channels. Returns each rank's result in
/// rank order.
pub fn run_tree<F, T>(ranks: usize, k: usize, body: F) -> Vec<T>
where
    F: Fn(&mut SpawnTree) -> T + Send + Sync + Clone + 'static,
    T: Send + 'static,
{
    let endpoints: Vec<Endpoint> = (0..ranks)
        .map(|_| Endpoint::open(TransportKind::Tcp).expect("open endpoint"))
        .collect();
    let names: Vec<String> = endpoints.iter().map(|e| e.name().to_string()).collect();

    let mut handles = Vec::with_capacity(ranks);
    for (rank, endpoint) in endpoints.into_iter().enumerate() {
        let node = topology(rank, ranks, k).expect("topology");
        let names = names.clone();
        let body = body.clone();
        handles.push(thread::spawn(move || {
            let mut parent = node
                .parent
                .map(|p| Channel::connect(&names[p]).expect("connect to parent"));
            if let Some(p) = parent.as_mut() {
                p.write_str(&rank.to_string()).expect("announce id to parent");
            }

            let mut children: Vec<Option<ChildLink>> =
                node.children.iter().map(|_| None).collect();
            for _ in 0..node.children.len() {
                let mut channel = Channel::accept(&endpoint).expect("accept child");
                let id: usize = channel
                    .read_str()
                    .expect("child id")
                    .parse()
                    .expect("child id is an integer");
                let slot = node
                    .children
                    .iter()
                    .position(|&r| r == id)
                    .expect("id matches an expected child");
                children[slot] = Some(ChildLink {
                    rank: id,
                    channel,
                    hostname: String::new(),
                    pid: None,
                });
            }

            let mut tree = SpawnTree {
                rank,
                ranks,
                parent,
                children: children.into_iter().map(|c| c.expect("child filled")).collect(),
            };
            body(&mut tree)
        }));
    }
    handles
        .into_iter()
        .map(|h| h.join().expect("rank thread panicked"))
        .collect()
}
