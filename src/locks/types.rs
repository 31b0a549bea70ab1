//! Diagnostic views of lock records.

use super::record::LockRecord;
use crate::store::ObjectId;
use std::fmt;

/// Information about a lock found in the store.
#[derive(Debug, Clone)]
pub struct LockInfo {
    /// Store identifier of the lock.
    pub id: ObjectId,

    /// The decoded lock record.
    pub record: LockRecord,

    /// Whether the lock was judged stale when listed.
    pub is_stale: bool,
}

impl fmt::Display for LockInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<9} {} (pid {}, age: {}{})",
            self.id.short(),
            self.record.kind_str(),
            self.record.owner(),
            self.record.pid,
            self.record.age_string(),
            if self.is_stale { ", STALE" } else { "" }
        )
    }
}

/// Outcome of a bulk lock removal.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Locks that were removed.
    pub removed: Vec<ObjectId>,

    /// Locks selected for removal whose removal failed.
    pub failed: Vec<ObjectId>,
}
