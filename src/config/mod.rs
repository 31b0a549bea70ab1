//! Configuration model for repolock.
//!
//! This module defines the Config struct that represents `<repo>/config.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for every field, and validation of config values.

mod model;
mod operations;


// Re-export public API
pub use model::Config;
