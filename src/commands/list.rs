//! Implementation of the `repolock list` command.

use crate::context::require_initialized_repo;
use crate::error::Result;
use crate::locks;
use std::path::Path;

/// Execute the `repolock list` command.
pub fn cmd_list(repo: Option<&Path>) -> Result<()> {
    let ctx = require_initialized_repo(repo)?;
    let config = ctx.config()?;
    let store = ctx.store();

    let locks = locks::list_locks(&store, &config)?;

    if locks.is_empty() {
        println!("No locks held.");
        return Ok(());
    }

    println!("Locks ({}):", locks.len());
    println!();
    for lock in &locks {
        println!("  {}", lock);
    }

    let stale_count = locks.iter().filter(|l| l.is_stale).count();
    if stale_count > 0 {
        println!();
        println!(
            "Note: {} lock(s) are stale. Use `repolock unlock` to remove them.",
            stale_count
        );
    }

    Ok(())
}
