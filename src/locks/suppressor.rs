//! Process-wide discarding of liveness probe signals.
//!
//! Other processes probe a lock owner by signalling it. Without a handler the
//! default action of the probe signal terminates the process, so every
//! process that may hold or inspect locks registers a listener once and keeps
//! it for the rest of its life.

use std::sync::OnceLock;

static STARTED: OnceLock<()> = OnceLock::new();

/// Start the background listener if it is not already running.
///
/// The handler is registered before this function returns, so a probe sent
/// after the first call can no longer terminate the process. Later calls are
/// no-ops.
pub fn ensure_started() {
    STARTED.get_or_init(start);
}

#[cfg(unix)]
fn start() {
    use super::probe::PROBE_SIGNAL;
    use signal_hook::iterator::Signals;
    use tracing::{debug, warn};

    let mut signals = match Signals::new([PROBE_SIGNAL]) {
        Ok(signals) => signals,
        Err(e) => {
            warn!(error = %e, "failed to register liveness probe signal handler");
            return;
        }
    };

    let spawned = std::thread::Builder::new()
        .name("repolock-probe-signals".to_string())
        .spawn(move || {
            for signal in signals.forever() {
                debug!(signal, "discarding liveness probe signal");
            }
        });

    match spawned {
        Ok(_) => debug!("liveness probe signal listener started"),
        Err(e) => warn!(error = %e, "failed to spawn liveness probe signal listener"),
    }
}

#[cfg(not(unix))]
fn start() {}
