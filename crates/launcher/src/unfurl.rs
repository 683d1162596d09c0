// SPDX-License-Identifier: MIT

//! Launcher unfurl: the 7-step state machine that takes a
//! freshly started process from bare environment/argv to a live
//! [`Session`] wired into the tree.

use std::collections::HashMap;
use std::process::Child;

use spawntree_channel::{Channel, ChildLink, Endpoint, SpawnTree, TransportKind};
use spawntree_collective::{allgather_strmap, broadcast_strmap, gather_strmap, signal_to_root};
use spawntree_core::debugger::{self, ProcDesc};
use spawntree_core::error::{Error, Result};
use spawntree_core::params::{DebugMode, Parameters, RemoteShell};
use spawntree_core::strmap::StrMap;
use spawntree_core::tree::tree;

use crate::env::{NonRootEnv, RootEnv};
use crate::group_start;
use crate::session::Session;
use crate::spawn;
use crate::which;

/// Run the unfurl state machine and return the session once this launcher's
/// own part of the tree is fully established and its application group has
/// started (steps 1-6). Step 7 (wait for local children) is the caller's
/// job, since the caller also owns the process exit-code mapping.
pub fn unfurl(argv_hosts: Vec<String>) -> Result<Session> {
    let non_root = NonRootEnv::from_env()?;

    // Step 1.
    let (id, mut params, parent, root_env) = match non_root {
        Some(nr) => {
            let mut parent = Channel::connect(&nr.parent_endpoint)?;
            let mut hello = StrMap::new();
            hello.set("ID", nr.id.to_string());
            hello.set("PID", std::process::id().to_string());
            parent.write_strmap(&hello)?;
            let params = Parameters::from_strmap(parent.read_strmap()?);
            (nr.id, params, Some(parent), None)
        }
        None => {
            let root_env = RootEnv::from_env()?;
            let params = build_root_parameters(&root_env, &argv_hosts)?;
            (0usize, params, None, Some(root_env))
        }
    };

    let endpoint = Endpoint::open(TransportKind::Tcp)?;

    let ranks = params.get_u64("N")? as usize;
    let deg = params.get_u64("DEG")? as usize;
    let node = tree(id, ranks, deg)?;

    let mut spawn_tree = SpawnTree::new(id, ranks);
    spawn_tree.parent = parent;

    // Step 2.
    let local_hostname = params.host(id)?.to_string();
    let exe = params.get_path("EXE")?;
    let remote_shell = params.remote_shell()?;
    let resolved_remote_exec = match remote_shell {
        RemoteShell::Ssh => params.get_path("ssh")?,
        RemoteShell::Rsh => params.get_path("rsh")?,
    };
    let resolved_env_bin = params.get_path("env")?;
    let copy = params.get_bool_or("COPY", false)?;

    if copy {
        let mut helpers = Vec::new();
        for &child_rank in &node.children {
            let host = params.host(child_rank)?.to_string();
            if host != local_hostname {
                let copy_cmd = match remote_shell {
                    RemoteShell::Ssh => params.get_path("scp")?,
                    RemoteShell::Rsh => params.get_path("rcp")?,
                };
                helpers.push(spawn::spawn_remote_copy(&copy_cmd, &exe, &host, &exe)?);
            }
        }
        for mut helper in helpers {
            let status = helper
                .wait()
                .map_err(|e| Error::spawn(format!("remote copy join failed: {e}")))?;
            if !status.success() {
                return Err(Error::spawn(format!("remote copy exited with {status}")));
            }
        }
    }

    let mut pending: HashMap<usize, (String, Child)> = HashMap::new();
    for &child_rank in &node.children {
        let host = params.host(child_rank)?.to_string();
        let child = spawn::spawn_launcher_child(
            &exe,
            &host,
            &local_hostname,
            child_rank,
            endpoint.name(),
            remote_shell,
            &resolved_remote_exec,
            &resolved_env_bin,
        )?;
        pending.insert(child_rank, (host, child));
    }

    // Step 3.
    let mut forked = Vec::with_capacity(node.children.len());
    for _ in 0..node.children.len() {
        let mut channel = Channel::accept(&endpoint)?;
        let hello = channel.read_strmap()?;
        let child_id: usize = hello
            .get("ID")
            .ok_or_else(|| Error::protocol("unfurl: child hello missing ID"))?
            .parse()
            .map_err(|_| Error::protocol("unfurl: child hello ID is not an integer"))?;
        let child_pid: u32 = hello
            .get("PID")
            .ok_or_else(|| Error::protocol("unfurl: child hello missing PID"))?
            .parse()
            .map_err(|_| Error::protocol("unfurl: child hello PID is not an integer"))?;
        let (hostname, process) = pending
            .remove(&child_id)
            .ok_or_else(|| Error::protocol(format!("unfurl: unexpected child ID {child_id}")))?;
        channel.write_strmap(params.as_strmap())?;
        spawn_tree.children.push(ChildLink {
            rank: child_id,
            channel,
            hostname,
            pid: Some(child_pid),
        });
        forked.push(process);
    }
    spawn_tree.children.sort_by_key(|c| c.rank);

    // Step 4.
    signal_to_root(&mut spawn_tree)?;

    // Step 5: measurement collectives, discarded once taken (except for an
    // optional debugger-table fill at root).
    run_measurement_phase(&mut spawn_tree, &params, root_env.as_ref())?;

    // Step 6.
    let group_params = match &root_env {
        Some(root_env) => Some(build_group_start_parameters(root_env)?),
        None => None,
    };
    let group_map = broadcast_strmap(&mut spawn_tree, group_params.map(Parameters::into_strmap))?;
    let group_params = Parameters::from_strmap(group_map);

    let mut session = Session::new(endpoint, spawn_tree, params.clone());
    session.waitable.extend(forked);
    group_start::process_group_start(&mut session, &group_params)?;

    Ok(session)
}

fn build_root_parameters(root_env: &RootEnv, argv_hosts: &[String]) -> Result<Parameters> {
    let transport: TransportKind = root_env.net.parse()?;
    // `Endpoint::open` is the authority on whether this build actually
    // supports the transport; validate here so an unsupported kind fails
    // as a Config error before any child is forked.
    if transport == TransportKind::Ibud {
        return Err(Error::config("ibud transport not available in this build"));
    }

    let ranks = argv_hosts.len() + 1;
    let mut params = Parameters::new();
    params.set("N", ranks.to_string());
    params.set("DEG", root_env.degree.to_string());
    params.set_host(0, crate::logging::hostname());
    for (i, host) in argv_hosts.iter().enumerate() {
        params.set_host(i + 1, host.clone());
    }

    let launcher_exe = std::env::current_exe()
        .map_err(Error::Io)?
        .to_string_lossy()
        .into_owned();

    params.set("SH", root_env.sh.clone());
    params.set("LOCAL", root_env.local.clone());
    params.set("MPIR", root_env.dbg.clone().unwrap_or_else(|| "unset".to_string()));

    for cmd in which::HELPER_COMMANDS {
        let resolved = which::resolve(cmd)?;
        params.set(cmd, resolved.display().to_string());
    }

    if root_env.copy {
        let scratch_dir = std::env::temp_dir().join("spawntree-stage");
        std::fs::create_dir_all(&scratch_dir).map_err(Error::Io)?;
        let basename = std::path::Path::new(&launcher_exe)
            .file_name()
            .ok_or_else(|| Error::config("launcher executable path has no file name"))?;
        let staged = scratch_dir.join(basename);
        std::fs::copy(&launcher_exe, &staged).map_err(Error::Io)?;
        params.set("EXE", staged.display().to_string());
        params.set("COPY", "1");
    } else {
        params.set("EXE", launcher_exe);
        params.set("COPY", "0");
    }

    Ok(params)
}

fn build_group_start_parameters(root_env: &RootEnv) -> Result<Parameters> {
    let app_exe = root_env
        .exe
        .clone()
        .ok_or_else(|| Error::config("MV2_SPAWN_EXE is required to start the application group"))?;
    let cwd = std::env::current_dir().map_err(Error::Io)?;

    let mut params = Parameters::new();
    params.set("NAME", "app");
    params.set("EXE", app_exe);
    params.set("CWD", cwd.display().to_string());
    params.set("PPN", root_env.ppn.to_string());
    params.set("PMI", if root_env.pmi { "1" } else { "0" });
    params.set("RING", if root_env.ring { "1" } else { "0" });
    params.set("FIFO", if root_env.fifo { "1" } else { "0" });
    params.set("BIN_BCAST", if root_env.bcast_bin { "1" } else { "0" });
    // Identifies this group-start's scratch subdirectory so every launcher
    // materializes a BIN_BCAST'd executable under the same relative path;
    // root's own pid is unique enough for one job run and costs nothing to
    // propagate.
    params.set("SID", std::process::id().to_string());
    Ok(params)
}

/// Pid gather, endpoint allgather, and a pack/unpack round-trip: optional
/// measurement collectives run once the tree is up. None of these may
/// change state observable to application processes; at root, a
/// `MPIR=spawn` debugger table fill is the one permitted side effect,
/// since the debugger table is itself process-wide and pre-application.
fn run_measurement_phase(
    tree: &mut SpawnTree,
    params: &Parameters,
    root_env: Option<&RootEnv>,
) -> Result<()> {
    let mut pid_report = StrMap::new();
    pid_report.set(
        format!("{}:pid", tree.rank),
        std::process::id().to_string(),
    );
    pid_report.set(format!("{}:host", tree.rank), params.host(tree.rank)?.to_string());
    let gathered = gather_strmap(tree, pid_report)?;

    let packed = gathered.pack();
    let _ = StrMap::unpack(&packed)?;

    let mut endpoints = StrMap::new();
    endpoints.set(tree.rank.to_string(), "present".to_string());
    let _ = allgather_strmap(tree, endpoints)?;

    if tree.is_root() {
        tracing::debug!(launchers = tree.ranks, "measurement phase complete");
        let debug_mode = root_env
            .map(|_| params.debug_mode())
            .transpose()?
            .unwrap_or(DebugMode::Unset);
        if debug_mode == DebugMode::Spawn {
            let exe = params.get_path("EXE")?;
            let mut procs = Vec::with_capacity(tree.ranks);
            for rank in 0..tree.ranks {
                let host = gathered
                    .get(&format!("{rank}:host"))
                    .unwrap_or("unknown")
                    .to_string();
                let pid: u32 = gathered
                    .get(&format!("{rank}:pid"))
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0);
                procs.push(ProcDesc { host_name: host, executable: exe.clone(), pid });
            }
            debugger::fill(procs);
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "unfurl_tests.rs"]
mod tests;
