//! Implementation of the `repolock init` command.
//!
//! Creates the repository layout:
//! 1. The repository root directory (if missing)
//! 2. The `locks/` object directory
//! 3. A default `config.yaml` (if missing)
//!
//! This command is idempotent: an existing config is never overwritten.

use crate::config::Config;
use crate::context::RepoContext;
use crate::error::{RepoLockError, Result};
use crate::fs::atomic_write;
use std::fs;
use std::path::Path;
use tracing::info;

/// Execute the `repolock init` command.
pub fn cmd_init(repo: Option<&Path>) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| {
        RepoLockError::UserError(format!("failed to get current working directory: {}", e))
    })?;
    // Unlike other commands, never walk up: init targets exactly this directory.
    let ctx = RepoContext::at(repo.map(|path| cwd.join(path)).unwrap_or(cwd));

    let config_created = init_repo(&ctx)?;

    println!("Initialized repository at {}", ctx.root.display());
    println!();
    println!("  {}/", ctx.locks_dir.display());
    if config_created {
        println!("  {}  (created with defaults)", ctx.config_path.display());
    } else {
        println!("  {}  (kept existing)", ctx.config_path.display());
    }

    Ok(())
}

/// Create the repository layout. Returns whether a new config was written.
pub(crate) fn init_repo(ctx: &RepoContext) -> Result<bool> {
    fs::create_dir_all(&ctx.locks_dir).map_err(|e| {
        RepoLockError::UserError(format!(
            "failed to create locks directory '{}': {}",
            ctx.locks_dir.display(),
            e
        ))
    })?;

    if ctx.config_path.exists() {
        // Refuse to treat a broken config as initialized.
        Config::load(&ctx.config_path)?;
        return Ok(false);
    }

    let yaml = Config::default().to_yaml()?;
    atomic_write(&ctx.config_path, yaml.as_bytes())?;
    info!(root = %ctx.root.display(), "initialized repository");
    Ok(true)
}
