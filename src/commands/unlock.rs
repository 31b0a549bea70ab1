//! Implementation of the `repolock unlock` command.

use crate::cli::UnlockArgs;
use crate::config::Config;
use crate::context::{RepoContext, require_initialized_repo};
use crate::error::{RepoLockError, Result};
use crate::locks::{self, SweepReport};
use std::path::Path;

/// Execute the `repolock unlock` command.
pub fn cmd_unlock(repo: Option<&Path>, args: UnlockArgs) -> Result<()> {
    let ctx = require_initialized_repo(repo)?;
    let config = ctx.config()?;

    let report = unlock(&ctx, &config, args.remove_all)?;

    let what = if args.remove_all { "" } else { "stale " };
    println!("Removed {} {}lock(s).", report.removed.len(), what);

    if !report.failed.is_empty() {
        return Err(RepoLockError::StoreError(format!(
            "failed to remove {} lock(s): {}",
            report.failed.len(),
            report
                .failed
                .iter()
                .map(|id| id.short())
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    Ok(())
}

/// Remove stale locks, or every lock when `remove_all` is set.
pub(crate) fn unlock(ctx: &RepoContext, config: &Config, remove_all: bool) -> Result<SweepReport> {
    let store = ctx.store();
    if remove_all {
        locks::remove_all_locks(&store)
    } else {
        locks::remove_stale_locks(&store, config)
    }
}
