// SPDX-License-Identifier: MIT

//! MPIR-style debugger attach table.
//!
//! The process descriptor table and state flag are observable by an
//! external debugger, so they live behind a process-wide, deliberately
//! leaked structure rather than being threaded through call arguments.
//! `mpir_breakpoint` is a real, non-inlinable function so a debugger can
//! set a breakpoint on its symbol once the table is filled — nothing here
//! requires `unsafe`.

use std::path::PathBuf;
use std::sync::OnceLock;

use parking_lot::Mutex;

/// One entry in the debugger descriptor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcDesc {
    pub host_name: String,
    pub executable: PathBuf,
    pub pid: u32,
}

/// Debugger attach state, mirrored from the MPIR convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebuggerState {
    #[default]
    Null,
    Spawned,
    Aborting,
}

#[derive(Debug, Default)]
struct Table {
    state: DebuggerState,
    procs: Vec<ProcDesc>,
}

fn table() -> &'static Mutex<Table> {
    static TABLE: OnceLock<Mutex<Table>> = OnceLock::new();
    TABLE.get_or_init(|| Mutex::new(Table::default()))
}

/// Replace the descriptor table, covering either the launcher tree
/// (`MPIR=spawn`) or the first application group (`MPIR=app`), then call
/// [`mpir_breakpoint`]. Only meaningful at rank 0.
pub fn fill(procs: Vec<ProcDesc>) {
    {
        let mut t = table().lock();
        t.procs = procs;
        t.state = DebuggerState::Spawned;
    }
    mpir_breakpoint();
}

/// Mark the table as aborting (job failed before completing the debugger
/// handshake).
pub fn mark_aborting() {
    table().lock().state = DebuggerState::Aborting;
}

pub fn state() -> DebuggerState {
    table().lock().state
}

pub fn snapshot() -> Vec<ProcDesc> {
    table().lock().procs.clone()
}

/// Quiescent function called once the table is filled. A debugger attaches
/// here and reads the table before resuming the process.
#[inline(never)]
pub fn mpir_breakpoint() {
    std::hint::black_box(());
}
