//! Directory-backed object store.

use super::{Backend, FileType, IdIter, ObjectId};
use crate::error::{RepoLockError, Result};
use crate::fs::atomic_write;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Object store rooted at a local (or network-mounted) directory.
///
/// Objects are stored at `<root>/<kind>/<id>`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Open a store rooted at `root`. The directory is not created.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory holding objects of the given kind.
    pub fn kind_dir(&self, kind: FileType) -> PathBuf {
        self.root.join(kind.as_str())
    }

    fn object_path(&self, kind: FileType, id: &ObjectId) -> PathBuf {
        self.kind_dir(kind).join(id.as_str())
    }
}

impl Backend for LocalStore {
    fn list(&self, kind: FileType) -> Result<IdIter<'_>> {
        let dir = self.kind_dir(kind);

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(Box::new(std::iter::empty::<Result<ObjectId>>()));
            }
            Err(e) => {
                return Err(RepoLockError::StoreError(format!(
                    "failed to list '{}': {}",
                    dir.display(),
                    e
                )));
            }
        };

        let ids = entries.filter_map(|entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    return Some(Err(RepoLockError::StoreError(format!(
                        "failed to read directory entry: {}",
                        e
                    ))));
                }
            };

            let name = entry.file_name();
            let name = name.to_string_lossy();

            // In-flight temp files from atomic writes.
            if name.starts_with('.') {
                return None;
            }

            match ObjectId::parse(&name) {
                Ok(id) => Some(Ok(id)),
                Err(_) => {
                    debug!(file = %name, "skipping foreign file in store listing");
                    None
                }
            }
        });

        Ok(Box::new(ids))
    }

    fn save(&self, kind: FileType, data: &[u8]) -> Result<ObjectId> {
        let id = ObjectId::generate(data);
        atomic_write(self.object_path(kind, &id), data)?;
        Ok(id)
    }

    fn load(&self, kind: FileType, id: &ObjectId) -> Result<Vec<u8>> {
        let path = self.object_path(kind, id);
        fs::read(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                RepoLockError::StoreError(format!("{} object {} not found", kind, id.short()))
            } else {
                RepoLockError::StoreError(format!("failed to read '{}': {}", path.display(), e))
            }
        })
    }

    fn remove(&self, kind: FileType, id: &ObjectId) -> Result<()> {
        let path = self.object_path(kind, id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RepoLockError::StoreError(format!(
                "failed to remove '{}': {}",
                path.display(),
                e
            ))),
        }
    }
}
