//! Handle for a held lock.

use super::record::LockRecord;
use crate::error::Result;
use crate::store::{Backend, ObjectId};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// A lock held by this process.
///
/// When dropped, the lock record is removed from the store.
/// If removal fails, a warning is logged but no panic occurs.
pub struct Lock {
    record: LockRecord,
    backend: Arc<dyn Backend>,
    released: bool,
}

impl Lock {
    pub(super) fn new(record: LockRecord, backend: Arc<dyn Backend>) -> Self {
        Self {
            record,
            backend,
            released: false,
        }
    }

    /// Store identifier of the lock record.
    pub fn id(&self) -> Option<&ObjectId> {
        self.record.id()
    }

    pub fn is_exclusive(&self) -> bool {
        self.record.exclusive
    }

    /// Manually release the lock.
    ///
    /// Use this instead of dropping the lock when removal errors must be
    /// handled.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.record.unlock(self.backend.as_ref())
    }
}

impl Drop for Lock {
    fn drop(&mut self) {
        if !self.released
            && let Err(e) = self.record.unlock(self.backend.as_ref())
        {
            warn!(error = %e, "failed to release lock");
        }
    }
}

impl fmt::Debug for Lock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lock")
            .field("record", &self.record)
            .field("released", &self.released)
            .finish()
    }
}
