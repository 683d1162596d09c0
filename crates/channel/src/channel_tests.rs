// SPDX-License-Identifier: MIT

use super::*;
use crate::endpoint::TransportKind;
use std::thread;

fn connected_pair() -> (Channel, Channel) {
    let endpoint = Endpoint::open(TransportKind::Tcp).unwrap();
    let name = endpoint.name().to_string();
    let server = thread::spawn(move || Channel::accept(&endpoint).unwrap());
    let client = Channel::connect(&name).unwrap();
    let server = server.join().unwrap();
    (client, server)
}

#[test]
fn write_then_read_moves_exact_bytes() {
    let (mut client, mut server) = connected_pair();
    client.write(b"hello world").unwrap();
    let got = server.read(11).unwrap();
    assert_eq!(got, b"hello world");
}

#[test]
fn str_round_trip_has_no_terminator_on_wire() {
    let (mut client, mut server) = connected_pair();
    client.write_str("BARRIER").unwrap();
    assert_eq!(server.read_str().unwrap(), "BARRIER");
}

#[test]
fn strmap_round_trip_over_the_wire() {
    let (mut client, mut server) = connected_pair();
    let mut map = spawntree_core::strmap::StrMap::new();
    map.set("RANK", "3");
    map.set("RANKS", "16");
    client.write_strmap(&map).unwrap();
    let got = server.read_strmap().unwrap();
    assert_eq!(got, map);
}

#[test]
fn disconnect_is_observed_as_transport_error_by_peer() {
    let (client, mut server) = connected_pair();
    drop(client);
    let err = server.read(4).unwrap_err();
    assert!(matches!(err, spawntree_core::error::Error::Transport(_)));
}

#[test]
fn connect_refused_on_nothing_listening() {
    // A closed endpoint's address is unlikely to be reused quickly enough
    // to flake; bind-then-drop to get a free port with nothing listening.
    let endpoint = Endpoint::open(TransportKind::Tcp).unwrap();
    let name = endpoint.name().to_string();
    drop(endpoint);
    assert!(Channel::connect(&name).is_err());
}
