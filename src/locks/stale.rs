//! Staleness judgment for lock records.

use super::probe::probe_process;
use super::record::LockRecord;
use chrono::Duration;
use tracing::debug;

impl LockRecord {
    /// Whether this lock has been abandoned.
    ///
    /// A lock is stale when it is older than `stale_after`, or when its
    /// owning process cannot be signalled. A live process that reused the
    /// owner's pid makes an abandoned lock look alive; only the age rule
    /// reclaims such locks.
    pub fn is_stale(&self, stale_after: Duration) -> bool {
        let id = self.id().map(|id| id.short()).unwrap_or("unsaved");
        debug!(lock = id, pid = self.pid, "testing if lock is stale");

        if self.age() > stale_after {
            debug!(lock = id, created_at = %self.created_at, "lock is stale, timestamp is too old");
            return true;
        }

        match probe_process(self.pid) {
            Ok(()) => {
                debug!(lock = id, pid = self.pid, "lock not stale, owner answered probe");
                false
            }
            Err(e) => {
                debug!(lock = id, error = %e, "lock is stale, owner did not answer probe");
                true
            }
        }
    }
}
