//! Liveness probing of lock owners.
//!
//! A probe sends [`PROBE_SIGNAL`] to a process id. Delivery succeeding means
//! some process with that id is alive; it does not prove it is the process
//! that created the lock, since ids are reused by the operating system.

use super::suppressor;
use thiserror::Error;

/// Signal used to probe a lock owner. Processes running this crate discard
/// it via [`super::suppressor`].
#[cfg(unix)]
pub const PROBE_SIGNAL: libc::c_int = libc::SIGHUP;

/// Why a probe did not reach a live process.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The id cannot name a process on this system.
    #[error("no process with id {0}")]
    NoSuchProcess(i64),

    /// The signal could not be delivered (process gone or not permitted).
    #[error("failed to signal process {pid}: {source}")]
    SignalFailed {
        pid: i64,
        #[source]
        source: std::io::Error,
    },
}

/// Map a recorded pid to a probe target.
///
/// Zero and negative targets address process groups rather than a single
/// process, so they never resolve. Neither do ids too large for `pid_t`.
#[cfg(unix)]
fn resolve_process(pid: i64) -> Option<libc::pid_t> {
    match libc::pid_t::try_from(pid) {
        Ok(target) if target > 0 => Some(target),
        _ => None,
    }
}

/// Send the liveness probe to `pid`.
///
/// The pid may be our own, so the signal listener is started first.
#[cfg(unix)]
pub fn probe_process(pid: i64) -> Result<(), ProbeError> {
    suppressor::ensure_started();

    let target = resolve_process(pid).ok_or(ProbeError::NoSuchProcess(pid))?;

    // SAFETY: kill takes plain integers; `target` is a positive pid, so it
    // addresses exactly one process.
    let rc = unsafe { libc::kill(target, PROBE_SIGNAL) };
    if rc == 0 {
        Ok(())
    } else {
        Err(ProbeError::SignalFailed {
            pid,
            source: std::io::Error::last_os_error(),
        })
    }
}

/// Without signals there is no way to probe; assume the owner is alive and
/// leave stale detection to the age rule.
#[cfg(not(unix))]
pub fn probe_process(_pid: i64) -> Result<(), ProbeError> {
    suppressor::ensure_started();
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    /// Set in a child test process that must start with no signal listener.
    const FRESH_CHILD_ENV: &str = "REPOLOCK_TEST_FRESH_CHILD";

    #[test]
    fn test_zero_and_negative_pids_do_not_resolve() {
        assert!(resolve_process(0).is_none());
        assert!(resolve_process(-1).is_none());
        assert!(matches!(probe_process(0), Err(ProbeError::NoSuchProcess(0))));
        assert!(matches!(
            probe_process(-42),
            Err(ProbeError::NoSuchProcess(-42))
        ));
    }

    #[test]
    fn test_out_of_range_pid_does_not_resolve() {
        assert!(resolve_process(i64::from(u32::MAX)).is_none());
        assert!(resolve_process(i64::from(i32::MAX) + 1).is_none());
        assert!(resolve_process(i64::MAX).is_none());
    }

    #[test]
    fn test_missing_process_fails_to_signal() {
        // Above any pid_max the kernel allows, so nothing can have this id.
        let pid = i64::from(i32::MAX);
        assert!(matches!(
            probe_process(pid),
            Err(ProbeError::SignalFailed { .. })
        ));
    }

    #[test]
    fn test_own_process_is_alive() {
        assert!(probe_process(i64::from(std::process::id())).is_ok());
    }

    /// Body of the child run below. Does nothing unless run as that child.
    #[test]
    fn fresh_child_signals_own_pid() {
        if std::env::var_os(FRESH_CHILD_ENV).is_none() {
            return;
        }
        assert!(probe_process(i64::from(std::process::id())).is_ok());
        std::thread::sleep(std::time::Duration::from_millis(50));
    }

    #[test]
    fn test_signalling_own_pid_in_fresh_process_survives() {
        let exe = std::env::current_exe().unwrap();
        let status = std::process::Command::new(exe)
            .args([
                "--exact",
                "locks::probe::tests::fresh_child_signals_own_pid",
                "--test-threads=1",
            ])
            .env(FRESH_CHILD_ENV, "1")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .unwrap();

        assert!(status.success(), "child test process died: {}", status);
    }
}
