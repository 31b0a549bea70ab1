//! Implementation of the `repolock exec` command.

use crate::cli::ExecArgs;
use crate::config::Config;
use crate::context::{RepoContext, require_initialized_repo};
use crate::error::{RepoLockError, Result};
use crate::locks;
use crate::store::{Backend, ObjectId};
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use tracing::info;

/// Execute the `repolock exec` command.
pub fn cmd_exec(repo: Option<&Path>, args: ExecArgs) -> Result<()> {
    let ctx = require_initialized_repo(repo)?;
    let config = ctx.config()?;
    run_locked(&ctx, &config, args.exclusive, &args.command)
}

/// Run `command` while holding a lock on the repository.
///
/// The lock is released after the program exits, whether it succeeded or not.
pub(crate) fn run_locked(
    ctx: &RepoContext,
    config: &Config,
    exclusive: bool,
    command: &[String],
) -> Result<()> {
    let (program, program_args) = command
        .split_first()
        .ok_or_else(|| RepoLockError::UserError("no program given".to_string()))?;

    let backend: Arc<dyn Backend> = Arc::new(ctx.store());
    let lock = locks::acquire_lock(backend, config, exclusive)?;
    info!(
        program = %program,
        lock = lock.id().map(ObjectId::short).unwrap_or_default(),
        exclusive = lock.is_exclusive(),
        "running program under lock"
    );

    let status = Command::new(program).args(program_args).status();

    lock.release()?;

    let status = status.map_err(|e| {
        RepoLockError::UserError(format!("failed to run '{}': {}", program, e))
    })?;

    if !status.success() {
        return Err(RepoLockError::CommandFailed(format!(
            "'{}' exited with {}",
            program, status
        )));
    }

    Ok(())
}
