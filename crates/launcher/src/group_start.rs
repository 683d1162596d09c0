// SPDX-License-Identifier: MIT

//! Process-group start: fork the local application processes for one
//! named group, register the group, then run whichever of the PMI/ring
//! bootstrap protocols the group-start parameters enabled. PMI runs
//! first, then ring, each as an independent accept phase — the two
//! bootstraps are independent and may both run in the same call.

use spawntree_bootstrap::{run_pmi, run_ring};
use spawntree_channel::{Channel, Endpoint};
use spawntree_collective::file_broadcast;
use spawntree_core::error::Result;
use spawntree_core::params::{DebugMode, Parameters};

use crate::session::Session;
use crate::spawn;

const PMI_ADDR_VAR: &str = "MV2_PMI_ADDR";
const MPIR_VAR: &str = "MV2_MPIR";

pub fn process_group_start(session: &mut Session, group_params: &Parameters) -> Result<()> {
    let name = group_params.require_str("NAME")?.to_string();
    let mut exe = group_params.get_path("EXE")?;
    let cwd = group_params.get_path("CWD")?;
    let ppn = group_params.get_u64("PPN")?;
    let pmi = group_params.get_bool("PMI")?;
    let ring = group_params.get_bool("RING")?;
    let bin_bcast = group_params.get_bool_or("BIN_BCAST", false)?;
    let fifo = group_params.get_bool_or("FIFO", false)?;

    if fifo {
        // FIFO is a recognized group-start toggle with no collective of its
        // own defined yet, unlike PMI/RING/BIN_BCAST. Recorded and logged
        // rather than silently dropped, the same way an unopenable `ibud`
        // transport is still a valid, visible configuration value.
        tracing::debug!("FIFO phase requested but has no defined collective in this build");
    }

    if bin_bcast {
        let sid = group_params.require_str("SID")?;
        let scratch_dir = std::env::temp_dir().join(format!("spawntree-{sid}"));
        let source = session.tree.is_root().then(|| exe.clone());
        exe = file_broadcast(&mut session.tree, source.as_deref(), &scratch_dir)?;
        mark_executable(&exe)?;
    }

    let local_launch = session.params.local_launch()?;
    let resolved_sh = session.params.get_path("sh")?;

    let mut app_env = vec![(PMI_ADDR_VAR.to_string(), session.endpoint.name().to_string())];
    if session.params.debug_mode()? == DebugMode::App {
        app_env.push((MPIR_VAR.to_string(), "1".to_string()));
    }

    let mut forked = Vec::with_capacity(ppn as usize);
    for _ in 0..ppn {
        forked.push(spawn::spawn_app_process(
            local_launch,
            &exe,
            &[],
            &cwd,
            &app_env,
            &resolved_sh,
        )?);
    }

    let pids: Vec<u32> = forked.iter().map(std::process::Child::id).collect();
    session.groups.start(name, group_params.clone(), pids)?;
    session.waitable.extend(forked);

    let rank = session.tree.rank as u64;
    let ranks = session.tree.ranks as u64;

    if pmi {
        let channels = accept_n(&session.endpoint, ppn)?;
        run_pmi(&mut session.tree, channels, rank, ranks, ppn)?;
    }
    if ring {
        let channels = accept_n(&session.endpoint, ppn)?;
        run_ring(&mut session.tree, channels, rank, ranks, ppn)?;
    }

    Ok(())
}

fn accept_n(endpoint: &Endpoint, n: u64) -> Result<Vec<Channel>> {
    (0..n).map(|_| Channel::accept(endpoint)).collect()
}

/// `file_broadcast` materializes plain bytes; a broadcast executable needs
/// its execute bit restored before it can be forked.
#[cfg(unix)]
fn mark_executable(path: &std::path::Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o755);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn mark_executable(_path: &std::path::Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "group_start_tests.rs"]
mod tests;
