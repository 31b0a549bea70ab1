//! Command implementations for repolock.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Each command resolves the repository context and then
//! delegates to a function taking that context, which is what tests drive.

mod exec;
mod init;
mod list;
mod unlock;

use crate::cli::{Cli, Command};
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let repo = cli.repo.as_deref();
    match cli.command {
        Command::Init => init::cmd_init(repo),
        Command::List => list::cmd_list(repo),
        Command::Unlock(args) => unlock::cmd_unlock(repo, args),
        Command::Exec(args) => exec::cmd_exec(repo, args),
    }
}
