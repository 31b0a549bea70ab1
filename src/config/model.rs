//! Config struct definition and default implementation.

use serde::{Deserialize, Serialize};

/// Configuration for a locked repository.
///
/// This struct represents the contents of `<repo>/config.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minutes after which a lock is considered stale regardless of its owner.
    #[serde(default = "default_stale_after_minutes")]
    pub stale_after_minutes: u32,

    /// Milliseconds to wait between persisting a new lock and re-checking
    /// for conflicting locks.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

// Default value functions for serde
fn default_stale_after_minutes() -> u32 {
    30
}
fn default_settle_delay_ms() -> u64 {
    200
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stale_after_minutes: default_stale_after_minutes(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}
