//! Lock acquisition, listing, and removal operations.

use super::enumerate::each_lock;
use super::guard::Lock;
use super::record::LockRecord;
use super::suppressor;
use super::types::{LockInfo, SweepReport};
use crate::config::Config;
use crate::error::{RepoLockError, Result};
use crate::store::{Backend, FileType};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Acquire a non-exclusive lock.
///
/// Any number of non-exclusive locks may be held at once. If an exclusive
/// lock is held by another process, `RepoLockError::AlreadyLocked` is
/// returned.
pub fn acquire_shared_lock(backend: Arc<dyn Backend>, config: &Config) -> Result<Lock> {
    acquire_lock(backend, config, false)
}

/// Acquire an exclusive lock.
///
/// If any other lock, exclusive or not, is held, `RepoLockError::AlreadyLocked`
/// is returned.
pub fn acquire_exclusive_lock(backend: Arc<dyn Backend>, config: &Config) -> Result<Lock> {
    acquire_lock(backend, config, true)
}

/// Acquire a lock by check, create, wait, re-check.
///
/// The store offers no atomic create-if-absent, so two processes can both
/// pass the first check. Waiting `settle_delay` before the second check gives
/// a concurrent writer's record time to become visible; whoever then sees a
/// conflict backs out. Two acquirers racing inside the settle window can
/// still both succeed.
///
/// # Returns
///
/// * `Ok(Lock)` - The lock is held until released or dropped
/// * `Err(RepoLockError::AlreadyLocked)` - A conflicting lock was seen
/// * `Err(RepoLockError::IdentityError)` - The user's numeric ids were invalid
/// * `Err(RepoLockError::StoreError)` - The store could not be listed or written
pub fn acquire_lock(backend: Arc<dyn Backend>, config: &Config, exclusive: bool) -> Result<Lock> {
    suppressor::ensure_started();

    let mut record = LockRecord::new(exclusive)?;

    check_for_other_locks(backend.as_ref(), &record)?;

    let id = record.save(backend.as_ref())?.clone();
    debug!(lock = id.short(), exclusive, "created lock record");

    std::thread::sleep(config.settle_delay());

    if let Err(e) = check_for_other_locks(backend.as_ref(), &record) {
        if let Err(remove_err) = record.unlock(backend.as_ref()) {
            warn!(
                lock = id.short(),
                error = %remove_err,
                "failed to remove lock after losing race"
            );
        }
        return Err(e);
    }

    info!(lock = id.short(), exclusive, "lock acquired");
    Ok(Lock::new(record, backend))
}

/// Look for locks that conflict with `candidate`.
///
/// An exclusive candidate conflicts with every other lock; a non-exclusive
/// candidate only with exclusive locks. The candidate's own record is skipped.
/// Locks that cannot be loaded are ignored rather than treated as conflicts.
fn check_for_other_locks(backend: &dyn Backend, candidate: &LockRecord) -> Result<()> {
    each_lock(backend, |id, lock| {
        if candidate.id() == Some(id) {
            return Ok(());
        }

        let lock = match lock {
            Ok(lock) => lock,
            Err(e) => {
                debug!(lock = id.short(), error = %e, "ignoring unreadable lock");
                return Ok(());
            }
        };

        if candidate.exclusive || lock.exclusive {
            return Err(RepoLockError::AlreadyLocked(format!(
                "lock {}: {}",
                id.short(),
                lock
            )));
        }

        Ok(())
    })
}

/// List all readable locks in the store, oldest first.
///
/// Each lock is judged for staleness using the configured threshold.
/// Locks that cannot be loaded are skipped.
pub fn list_locks(backend: &dyn Backend, config: &Config) -> Result<Vec<LockInfo>> {
    suppressor::ensure_started();

    let mut locks = Vec::new();

    each_lock(backend, |id, lock| {
        match lock {
            Ok(record) => {
                let is_stale = record.is_stale(config.stale_after());
                locks.push(LockInfo {
                    id: id.clone(),
                    record,
                    is_stale,
                });
            }
            Err(e) => debug!(lock = id.short(), error = %e, "skipping unreadable lock"),
        }
        Ok(())
    })?;

    locks.sort_by(|a, b| {
        a.record
            .created_at
            .cmp(&b.record.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    Ok(locks)
}

/// Remove every lock judged stale.
///
/// Unreadable locks are left alone. A failed removal is logged and recorded
/// in the report, and the sweep continues with the remaining locks. Only a
/// failure to list the store is returned as an error; locks removed before it
/// stay removed.
pub fn remove_stale_locks(backend: &dyn Backend, config: &Config) -> Result<SweepReport> {
    suppressor::ensure_started();

    let mut report = SweepReport::default();

    each_lock(backend, |id, lock| {
        let lock = match lock {
            Ok(lock) => lock,
            Err(e) => {
                debug!(lock = id.short(), error = %e, "ignoring unreadable lock");
                return Ok(());
            }
        };

        if !lock.is_stale(config.stale_after()) {
            return Ok(());
        }

        match backend.remove(FileType::Lock, id) {
            Ok(()) => {
                info!(lock = id.short(), "removed stale lock");
                report.removed.push(id.clone());
            }
            Err(e) => {
                warn!(lock = id.short(), error = %e, "failed to remove stale lock");
                report.failed.push(id.clone());
            }
        }
        Ok(())
    })?;

    Ok(report)
}

/// Remove every lock in the store, whether stale, live, or unreadable.
///
/// Removal failures are logged and recorded in the report.
pub fn remove_all_locks(backend: &dyn Backend) -> Result<SweepReport> {
    let mut report = SweepReport::default();

    each_lock(backend, |id, _lock| {
        match backend.remove(FileType::Lock, id) {
            Ok(()) => {
                info!(lock = id.short(), "removed lock");
                report.removed.push(id.clone());
            }
            Err(e) => {
                warn!(lock = id.short(), error = %e, "failed to remove lock");
                report.failed.push(id.clone());
            }
        }
        Ok(())
    })?;

    Ok(report)
}
