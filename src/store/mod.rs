//! Store adapter for repolock.
//!
//! Lock records live in a content-addressable object store. The lock subsystem
//! only needs four primitives from it (list/save/load/remove), expressed by the
//! [`Backend`] trait. No compare-and-swap or transaction is assumed: every
//! coordination guarantee comes from the lock protocol itself.
//!
//! # Object Identity
//!
//! Objects are identified by the lower-case hex SHA-256 of a random salt
//! followed by their content. The identifier is assigned by the store at save
//! time, never chosen by the caller, and saving the same bytes twice yields
//! two distinct objects.

mod local;


pub use local::LocalStore;

use crate::error::{RepoLockError, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Category of object kept in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileType {
    /// Lock records.
    Lock,
}

impl FileType {
    /// Directory / namespace name for this kind of object.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Lock => "locks",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque identifier of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    /// Length of an identifier in hex characters.
    pub const HEX_LEN: usize = 64;

    /// Generate a fresh identifier for one save of `data`.
    pub fn generate(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(Uuid::new_v4().as_bytes());
        hasher.update(data);
        Self(hex::encode(hasher.finalize()))
    }

    /// Parse an identifier from its hex form.
    pub fn parse(s: &str) -> Result<Self> {
        let valid = s.len() == Self::HEX_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !valid {
            return Err(RepoLockError::StoreError(format!(
                "invalid object id '{}'",
                s
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Full hex form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lazily produced sequence of object ids.
///
/// Dropping the iterator releases whatever the listing holds (directory
/// handles, snapshots), so consumers may stop at any point.
pub type IdIter<'a> = Box<dyn Iterator<Item = Result<ObjectId>> + 'a>;

/// Primitives consumed from the object store.
pub trait Backend: Send + Sync {
    /// Enumerate all objects of the given kind, in no meaningful order.
    fn list(&self, kind: FileType) -> Result<IdIter<'_>>;

    /// Persist `data` durably and return its newly assigned identifier.
    fn save(&self, kind: FileType, data: &[u8]) -> Result<ObjectId>;

    /// Read back a previously saved object.
    fn load(&self, kind: FileType, id: &ObjectId) -> Result<Vec<u8>>;

    /// Delete an object. Removing an object that does not exist is not an error.
    fn remove(&self, kind: FileType, id: &ObjectId) -> Result<()>;
}
