//! Filesystem utilities for repolock.
//!
//! The local store relies on durable, all-or-nothing object writes: a lock
//! object that another process can list must already be complete on disk.

pub mod atomic;

pub use atomic::atomic_write;
