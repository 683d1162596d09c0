// SPDX-License-Identifier: MIT

//! Structured diagnostics: every launcher emits `tracing` events
//! tagged with program name, host, pid, timestamp, message, and source
//! location. The format layer supplies the timestamp and call site; this
//! module only attaches the persistent `host`/`pid`/`rank` fields and
//! wires the subscriber to `SPAWNTREE_LOG` (falls back to `info`).
//!
//! Stderr is always on. A second, daily-rotating file sink
//! (`tracing-appender`) is layered on top of it when `SPAWNTREE_LOG_DIR`
//! is set, for operators who want a durable trail alongside the console.

use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SPAWNTREE_LOG";
const LOG_DIR_ENV: &str = "SPAWNTREE_LOG_DIR";

/// Keeps the file appender's background flush thread alive for the
/// process's lifetime; dropping it would silently stop writes.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize the process-wide subscriber. Safe to call once per process;
/// a second call is a no-op rather than a panic, so tests that build
/// multiple launcher sessions in one process don't need to guard it.
pub fn init() {
    let filter = || EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let registry = tracing_subscriber::registry().with(filter()).with(stderr_layer);

    if let Ok(dir) = std::env::var(LOG_DIR_ENV) {
        let appender = tracing_appender::rolling::daily(dir, "spawntree.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        let file_layer = tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false);
        let _ = registry.with(file_layer).try_init();
    } else {
        let _ = registry.try_init();
    }
}

/// A span carrying the fields every diagnostic must have alongside the
/// message and tracing's own timestamp/location: `host`, `pid`, and this
/// launcher's `rank`.
pub fn launcher_span(rank: usize) -> tracing::Span {
    let host = hostname();
    let pid = std::process::id();
    tracing::info_span!("launcher", host = %host, pid = %pid, rank = %rank)
}

pub(crate) fn hostname() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| {
        std::process::Command::new("hostname")
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| "localhost".to_string())
    })
}
