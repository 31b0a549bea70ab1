//! The lock record persisted in the store.

use super::identity::{self, UserInfo};
use crate::error::{RepoLockError, Result};
use crate::store::{Backend, FileType, ObjectId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One process's claim on the repository.
///
/// There are two kinds of locks: exclusive and non-exclusive. Any number of
/// non-exclusive locks may coexist, but an exclusive lock must be the only
/// lock in the repository.
///
/// Every field except `id` is fixed at construction. The `id` is assigned
/// by the store when the record is first saved; a record without one has
/// never been persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockRecord {
    /// When the lock was created.
    #[serde(rename = "time")]
    pub created_at: DateTime<Utc>,

    /// Whether the lock excludes every other lock.
    pub exclusive: bool,

    /// Host that created the lock; empty if unknown.
    #[serde(default)]
    pub hostname: String,

    /// User that created the lock; empty if unknown.
    #[serde(default)]
    pub username: String,

    /// Process id of the creator, used as the liveness probe target.
    ///
    /// Signed and wide so that records written elsewhere with ids this
    /// platform cannot signal still decode; such ids count as dead.
    pub pid: i64,

    /// Numeric user id; zero if unknown.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub uid: u32,

    /// Numeric group id; zero if unknown.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub gid: u32,

    #[serde(skip)]
    id: Option<ObjectId>,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl LockRecord {
    /// Build a record for the current process, host, and user.
    pub fn new(exclusive: bool) -> Result<Self> {
        Self::with_identity(
            exclusive,
            identity::current_hostname(),
            identity::current_user(),
        )
    }

    /// Build a record for the current process with an explicit host and user.
    ///
    /// A missing hostname or user is tolerated and leaves the fields empty.
    /// A user whose numeric ids cannot be parsed fails construction.
    pub fn with_identity(
        exclusive: bool,
        hostname: Option<String>,
        user: Option<UserInfo>,
    ) -> Result<Self> {
        let mut record = Self {
            created_at: Utc::now(),
            exclusive,
            hostname: hostname.unwrap_or_default(),
            username: String::new(),
            pid: i64::from(std::process::id()),
            uid: 0,
            gid: 0,
            id: None,
        };

        if let Some(user) = user {
            let (uid, gid) = user.parse_ids()?;
            record.username = user.username;
            record.uid = uid;
            record.gid = gid;
        }

        Ok(record)
    }

    /// Store identifier, once persisted.
    pub fn id(&self) -> Option<&ObjectId> {
        self.id.as_ref()
    }

    /// Load and decode a lock record from the store.
    pub fn load(backend: &dyn Backend, id: &ObjectId) -> Result<Self> {
        let data = backend.load(FileType::Lock, id)?;
        let mut record: LockRecord = serde_json::from_slice(&data).map_err(|e| {
            RepoLockError::StoreError(format!("failed to decode lock {}: {}", id.short(), e))
        })?;
        record.id = Some(id.clone());
        Ok(record)
    }

    /// Serialize to the JSON storage format.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| {
            RepoLockError::StoreError(format!("failed to serialize lock record: {}", e))
        })
    }

    /// Persist this record and remember the identifier the store assigned.
    pub(crate) fn save(&mut self, backend: &dyn Backend) -> Result<&ObjectId> {
        let data = self.to_json()?;
        let id = backend.save(FileType::Lock, &data)?;
        Ok(&*self.id.insert(id))
    }

    /// Remove this record from the store.
    ///
    /// A record that was never persisted has nothing to remove, so this is
    /// a no-op returning `Ok`.
    pub fn unlock(&self, backend: &dyn Backend) -> Result<()> {
        match &self.id {
            Some(id) => backend.remove(FileType::Lock, id),
            None => Ok(()),
        }
    }

    /// Age of the lock.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.created_at)
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self) -> String {
        let age = self.age();
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }

    /// `user@host` of the creator, with placeholders for unknown parts.
    pub fn owner(&self) -> String {
        let user = if self.username.is_empty() {
            "unknown"
        } else {
            &self.username
        };
        let host = if self.hostname.is_empty() {
            "unknown"
        } else {
            &self.hostname
        };
        format!("{}@{}", user, host)
    }

    pub(crate) fn kind_str(&self) -> &'static str {
        if self.exclusive { "exclusive" } else { "shared" }
    }
}

impl fmt::Display for LockRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lock held by {} (pid {}, created {} ago)",
            self.kind_str(),
            self.owner(),
            self.pid,
            self.age_string()
        )
    }
}
