//! Iteration over every lock record in the store.

use super::record::LockRecord;
use crate::error::Result;
use crate::store::{Backend, FileType, ObjectId};

/// Visit every lock object currently listed in the store.
///
/// The visitor receives each id together with either the decoded record or
/// the error that prevented decoding it. Decode failures never stop the
/// iteration; the visitor decides what to do with them.
///
/// Returning `Err` from the visitor stops the iteration immediately and the
/// error is returned to the caller. The underlying listing is dropped on every
/// exit path, releasing any resources it holds. A failure of the listing
/// itself is also returned.
pub fn each_lock<F>(backend: &dyn Backend, mut visit: F) -> Result<()>
where
    F: FnMut(&ObjectId, Result<LockRecord>) -> Result<()>,
{
    let ids = backend.list(FileType::Lock)?;

    for id in ids {
        let id = id?;
        let record = LockRecord::load(backend, &id);
        visit(&id, record)?;
    }

    Ok(())
}
