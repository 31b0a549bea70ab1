//! Locking subsystem for repolock.
//!
//! Processes that share a repository coordinate through small lock records
//! kept in the repository's object store. There is no lock server and no
//! atomic primitive in the store; the protocol tolerates races and dead
//! processes instead of ruling them out.
//!
//! # Lock Kinds
//!
//! - **Exclusive**: must be the only lock in the repository.
//! - **Non-exclusive**: may coexist with other non-exclusive locks, but never
//!   with an exclusive one.
//!
//! # Lock Records
//!
//! Each lock object contains JSON:
//! - `time`: RFC3339 creation timestamp
//! - `exclusive`: lock kind
//! - `hostname`, `username`: best-effort creator identity
//! - `pid`: creator process id, used for liveness probing
//! - `uid`, `gid`: numeric ids, omitted when unknown
//!
//! # Acquisition
//!
//! A lock is acquired by checking for conflicting locks, saving a new record,
//! waiting a short settle delay, and checking again. A conflict seen in the
//! second check removes the new record again.
//!
//! # Stale Locks
//!
//! Records left behind by crashed processes are reclaimed by
//! [`remove_stale_locks`]. A lock is stale when it is older than the
//! configured threshold or its owning process no longer answers a probe
//! signal. Processes using this module discard that signal via
//! [`suppressor::ensure_started`].

mod enumerate;
mod guard;
mod identity;
mod operations;
mod probe;
mod record;
mod stale;
pub mod suppressor;
mod types;


// Re-export public API
pub use enumerate::each_lock;
pub use guard::Lock;
pub use identity::UserInfo;
pub use operations::{
    acquire_exclusive_lock, acquire_lock, acquire_shared_lock, list_locks, remove_all_locks,
    remove_stale_locks,
};
pub use probe::{ProbeError, probe_process};
pub use record::LockRecord;
pub use types::{LockInfo, SweepReport};
