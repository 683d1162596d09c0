// SPDX-License-Identifier: MIT

use super::*;
use spawntree_channel::{Endpoint, SpawnTree, TransportKind};
use spawntree_core::params::Parameters;

fn launcher_params() -> Parameters {
    let mut params = Parameters::new();
    params.set("SH", "ssh");
    params.set("LOCAL", "direct");
    params.set("sh", "/bin/sh");
    params.set("MPIR", "unset");
    params
}

fn group_params(name: &str, ppn: u64) -> Parameters {
    let mut params = Parameters::new();
    params.set("NAME", name);
    params.set("EXE", "/bin/true");
    params.set("CWD", std::env::temp_dir().display().to_string());
    params.set("PPN", ppn.to_string());
    params.set("PMI", "0");
    params.set("RING", "0");
    params
}

#[test]
fn starts_ppn_processes_and_registers_the_group() {
    let endpoint = Endpoint::open(TransportKind::Tcp).unwrap();
    let mut session = Session::new(endpoint, SpawnTree::new(0, 1), launcher_params());

    process_group_start(&mut session, &group_params("app", 2)).unwrap();

    assert_eq!(session.waitable.len(), 2);
    assert_eq!(session.groups.len(), 1);
    assert_eq!(session.groups.get("app").unwrap().count, 2);

    for child in session.waitable.iter_mut() {
        let status = child.wait().unwrap();
        assert!(status.success());
    }
}

#[test]
fn starting_the_same_group_name_twice_is_rejected() {
    let endpoint = Endpoint::open(TransportKind::Tcp).unwrap();
    let mut session = Session::new(endpoint, SpawnTree::new(0, 1), launcher_params());

    process_group_start(&mut session, &group_params("app", 1)).unwrap();
    let err = process_group_start(&mut session, &group_params("app", 1));
    assert!(err.is_err());

    for child in session.waitable.iter_mut() {
        let _ = child.wait();
    }
}

#[test]
fn bin_bcast_materializes_an_executable_app_binary() {
    use std::os::unix::fs::PermissionsExt;

    let src_dir = tempfile::tempdir().unwrap();
    let script = src_dir.path().join("app");
    std::fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
    let mut perms = std::fs::metadata(&script).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script, perms).unwrap();

    let endpoint = Endpoint::open(TransportKind::Tcp).unwrap();
    let mut session = Session::new(endpoint, SpawnTree::new(0, 1), launcher_params());

    let mut params = group_params("app", 1);
    params.set("EXE", script.display().to_string());
    params.set("BIN_BCAST", "1");
    params.set("SID", "test-sid");

    process_group_start(&mut session, &params).unwrap();

    let scratch = std::env::temp_dir().join("spawntree-test-sid").join("app");
    assert!(scratch.exists());
    let mode = std::fs::metadata(&scratch).unwrap().permissions().mode();
    assert_ne!(mode & 0o111, 0, "broadcast binary should be executable");

    for child in session.waitable.iter_mut() {
        let status = child.wait().unwrap();
        assert!(status.success());
    }
    std::fs::remove_dir_all(std::env::temp_dir().join("spawntree-test-sid")).ok();
}
