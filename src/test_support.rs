//! In-memory and fault-injecting store backends for tests.

use crate::error::{RepoLockError, Result};
use crate::locks::LockRecord;
use crate::store::{Backend, FileType, IdIter, ObjectId};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Object store held in memory.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    objects: Mutex<BTreeMap<(FileType, ObjectId), Vec<u8>>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn len(&self, kind: FileType) -> usize {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    pub(crate) fn contains(&self, kind: FileType, id: &ObjectId) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(kind, id.clone()))
    }

    /// Persist a record as another process would, returning its id.
    pub(crate) fn insert_record(&self, record: &LockRecord) -> ObjectId {
        self.save(FileType::Lock, &record.to_json().unwrap()).unwrap()
    }

    /// Persist bytes that do not decode as a lock record.
    pub(crate) fn insert_corrupt(&self) -> ObjectId {
        self.save(FileType::Lock, b"{ this is not a lock").unwrap()
    }
}

impl Backend for MemoryStore {
    fn list(&self, kind: FileType) -> Result<IdIter<'_>> {
        // Snapshot, so callers may mutate the store while iterating.
        let ids: Vec<Result<ObjectId>> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, id)| Ok(id.clone()))
            .collect();
        Ok(Box::new(ids.into_iter()))
    }

    fn save(&self, kind: FileType, data: &[u8]) -> Result<ObjectId> {
        let id = ObjectId::generate(data);
        self.objects
            .lock()
            .unwrap()
            .insert((kind, id.clone()), data.to_vec());
        Ok(id)
    }

    fn load(&self, kind: FileType, id: &ObjectId) -> Result<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(kind, id.clone()))
            .cloned()
            .ok_or_else(|| {
                RepoLockError::StoreError(format!("{} object {} not found", kind, id.short()))
            })
    }

    fn remove(&self, kind: FileType, id: &ObjectId) -> Result<()> {
        self.objects.lock().unwrap().remove(&(kind, id.clone()));
        Ok(())
    }
}

/// Store where a competing process's lock becomes visible right after our
/// first save, i.e. inside the settle window.
pub(crate) struct RacingStore {
    pub(crate) inner: Arc<MemoryStore>,
    competitor: LockRecord,
    fired: AtomicBool,
}

impl RacingStore {
    pub(crate) fn new(competitor: LockRecord) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::new(),
            competitor,
            fired: AtomicBool::new(false),
        })
    }
}

impl Backend for RacingStore {
    fn list(&self, kind: FileType) -> Result<IdIter<'_>> {
        self.inner.list(kind)
    }

    fn save(&self, kind: FileType, data: &[u8]) -> Result<ObjectId> {
        let id = self.inner.save(kind, data)?;
        if !self.fired.swap(true, Ordering::SeqCst) {
            self.inner.insert_record(&self.competitor);
        }
        Ok(id)
    }

    fn load(&self, kind: FileType, id: &ObjectId) -> Result<Vec<u8>> {
        self.inner.load(kind, id)
    }

    fn remove(&self, kind: FileType, id: &ObjectId) -> Result<()> {
        self.inner.remove(kind, id)
    }
}

/// Store with injectable failures for listing, saving, and removal.
pub(crate) struct FaultyStore {
    pub(crate) inner: Arc<MemoryStore>,
    fail_remove_of: Mutex<Vec<ObjectId>>,
    fail_all_removes: AtomicBool,
    fail_saves: AtomicBool,
    fail_lists_after: Mutex<Option<usize>>,
    trailing_list_error: AtomicBool,
    saves: AtomicUsize,
    pub(crate) remove_calls: AtomicUsize,
}

impl FaultyStore {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::new(),
            fail_remove_of: Mutex::new(Vec::new()),
            fail_all_removes: AtomicBool::new(false),
            fail_saves: AtomicBool::new(false),
            fail_lists_after: Mutex::new(None),
            trailing_list_error: AtomicBool::new(false),
            saves: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn fail_remove_of(&self, id: &ObjectId) {
        self.fail_remove_of.lock().unwrap().push(id.clone());
    }

    pub(crate) fn fail_all_removes(&self) {
        self.fail_all_removes.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    /// Every listing fails outright.
    pub(crate) fn fail_lists(&self) {
        self.fail_lists_after_saves(0);
    }

    /// Listings fail once `saves` successful saves have happened.
    pub(crate) fn fail_lists_after_saves(&self, saves: usize) {
        *self.fail_lists_after.lock().unwrap() = Some(saves);
    }

    /// Listings yield every stored id and then one failed entry.
    pub(crate) fn fail_listing_at_end(&self) {
        self.trailing_list_error.store(true, Ordering::SeqCst);
    }
}

impl Backend for FaultyStore {
    fn list(&self, kind: FileType) -> Result<IdIter<'_>> {
        let threshold = *self.fail_lists_after.lock().unwrap();
        if let Some(threshold) = threshold
            && self.saves.load(Ordering::SeqCst) >= threshold
        {
            return Err(RepoLockError::StoreError("injected list failure".to_string()));
        }

        let ids = self.inner.list(kind)?;
        if self.trailing_list_error.load(Ordering::SeqCst) {
            let failed = RepoLockError::StoreError("injected listing entry failure".to_string());
            return Ok(Box::new(ids.chain(std::iter::once(Err(failed)))));
        }
        Ok(ids)
    }

    fn save(&self, kind: FileType, data: &[u8]) -> Result<ObjectId> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepoLockError::StoreError("injected save failure".to_string()));
        }
        let id = self.inner.save(kind, data)?;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    fn load(&self, kind: FileType, id: &ObjectId) -> Result<Vec<u8>> {
        self.inner.load(kind, id)
    }

    fn remove(&self, kind: FileType, id: &ObjectId) -> Result<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all_removes.load(Ordering::SeqCst)
            || self.fail_remove_of.lock().unwrap().contains(id)
        {
            return Err(RepoLockError::StoreError("injected remove failure".to_string()));
        }
        self.inner.remove(kind, id)
    }
}
