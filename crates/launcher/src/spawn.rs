// SPDX-License-Identifier: MIT

//! Local and remote process spawning.
//!
//! Local fork+exec of a launcher or application child is
//! `std::process::Command::spawn` plus the `MV2_SPAWN_*` environment
//! variables rather than a raw `fork`/`exec` binding. Remote exec
//! (`SH=rsh|ssh`) and remote copy (`COPY=1`) are likewise plain
//! `Command::new(resolved_path)` invocations of the resolved
//! `rsh`/`ssh`/`scp`/`rcp` paths carried in the parameter strmap.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Child, Command};

use spawntree_core::error::{Error, Result};
use spawntree_core::params::{LocalLaunch, RemoteShell};

/// Fork the launcher binary for child rank `child_id`, local if `host`
/// matches this machine's own hostname, remote otherwise.
pub fn spawn_launcher_child(
    exe: &Path,
    host: &str,
    local_hostname: &str,
    child_id: usize,
    parent_endpoint: &str,
    remote_shell: RemoteShell,
    resolved_sh: &Path,
    resolved_env: &Path,
) -> Result<Child> {
    let mut env = BTreeMap::new();
    env.insert("MV2_SPAWN_PARENT".to_string(), parent_endpoint.to_string());
    env.insert("MV2_SPAWN_ID".to_string(), child_id.to_string());

    if host == local_hostname {
        Command::new(exe)
            .envs(env)
            .spawn()
            .map_err(|e| Error::spawn(format!("local exec of rank {child_id} failed: {e}")))
    } else {
        let sh_name = match remote_shell {
            RemoteShell::Rsh => "rsh",
            RemoteShell::Ssh => "ssh",
        };
        let remote_cmd = remote_command_line(resolved_env, &env, exe);
        Command::new(resolved_sh)
            .arg(host)
            .arg(remote_cmd)
            .spawn()
            .map_err(|e| Error::spawn(format!("{sh_name} exec of rank {child_id} on {host} failed: {e}")))
    }
}

/// Copy the launcher executable to `dest` on `host` ahead of a remote exec
/// (`COPY=1`), using the resolved `scp`/`rcp` path matching `remote_shell`.
pub fn spawn_remote_copy(
    resolved_copy_cmd: &Path,
    local_exe: &Path,
    host: &str,
    dest: &Path,
) -> Result<Child> {
    let target = format!("{host}:{}", dest.display());
    Command::new(resolved_copy_cmd)
        .arg(local_exe)
        .arg(&target)
        .spawn()
        .map_err(|e| Error::spawn(format!("remote copy to {target} failed: {e}")))
}

/// Fork one application process for the local group (§4.H/§4.I), honoring
/// `LOCAL=shell|direct`.
pub fn spawn_app_process(
    local: LocalLaunch,
    exe: &Path,
    args: &[String],
    cwd: &Path,
    env: &[(String, String)],
    resolved_sh: &Path,
) -> Result<Child> {
    match local {
        LocalLaunch::Direct => Command::new(exe)
            .args(args)
            .current_dir(cwd)
            .envs(env.iter().cloned())
            .spawn()
            .map_err(|e| Error::spawn(format!("direct exec of {} failed: {e}", exe.display()))),
        LocalLaunch::Shell => {
            let mut cmdline = exe.display().to_string();
            for a in args {
                cmdline.push(' ');
                cmdline.push_str(a);
            }
            Command::new(resolved_sh)
                .arg("-c")
                .arg(cmdline)
                .current_dir(cwd)
                .envs(env.iter().cloned())
                .spawn()
                .map_err(|e| Error::spawn(format!("shell exec of {} failed: {e}", exe.display())))
        }
    }
}

/// Build `env K=V K2=V2 ... exe` for a remote shell invocation, using the
/// resolved `env` binary path so the child's environment is established
/// independent of whatever the remote login shell does with exported
/// variables.
fn remote_command_line(resolved_env: &Path, vars: &BTreeMap<String, String>, exe: &Path) -> String {
    let mut parts = vec![resolved_env.display().to_string()];
    for (k, v) in vars {
        parts.push(format!("{k}={v}"));
    }
    parts.push(exe.display().to_string());
    parts.join(" ")
}
