//! daylog's own diagnostics, written straight to stderr and never through a `Logger`.
//!
//! Debug output is opt-in through `DAYLOG_DEBUG`, read once via `OnceLock`.

use std::io::Write;
use std::sync::OnceLock;

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

fn debug_enabled() -> bool {
    *DEBUG_ENABLED.get_or_init(|| std::env::var_os("DAYLOG_DEBUG").is_some_and(|v| v != "0"))
}

fn emit(kind: &str, scope: &str, msg: &str) {
    // A failing stderr leaves nowhere else to report to.
    let _ = writeln!(std::io::stderr().lock(), "daylog: {kind} [{scope}] {msg}");
}

/// Rotation, sweep and daemon lifecycle details.
pub fn debug(scope: &str, msg: &str) {
    if debug_enabled() {
        emit("debug", scope, msg);
    }
}

/// Best-effort failures that were tolerated (sweep, mail).
pub fn warn(scope: &str, msg: &str) {
    emit("warn", scope, msg);
}

/// Failures that end the process or break a contract.
pub fn error(scope: &str, msg: &str) {
    emit("error", scope, msg);
}
