//! CLI argument parsing for repolock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Repolock: cooperative exclusive/shared locking for shared repositories.
///
/// Processes on any number of machines coordinate through lock records kept
/// in the repository itself. Exclusive locks must run alone; shared locks may
/// run together but never alongside an exclusive lock.
#[derive(Parser, Debug)]
#[command(name = "repolock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Repository root (default: nearest repository at or above the current directory).
    #[arg(short, long, global = true)]
    pub repo: Option<PathBuf>,

    /// Log protocol decisions to stderr (overridden by REPOLOCK_LOG).
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for repolock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a repository in the target directory.
    ///
    /// Creates the locks/ directory and a default config.yaml.
    Init,

    /// List all locks in the repository.
    ///
    /// Shows each lock's kind, owner, pid, and age, and flags stale locks.
    List,

    /// Remove stale locks.
    ///
    /// A lock is stale when it is older than the configured threshold or its
    /// owning process is gone.
    Unlock(UnlockArgs),

    /// Run a program while holding a lock.
    ///
    /// The lock is acquired before the program starts and released after it
    /// exits.
    Exec(ExecArgs),
}

/// Arguments for the `unlock` command.
#[derive(Parser, Debug)]
pub struct UnlockArgs {
    /// Remove every lock, including locks of running processes.
    #[arg(long)]
    pub remove_all: bool,
}

/// Arguments for the `exec` command.
#[derive(Parser, Debug)]
pub struct ExecArgs {
    /// Take an exclusive lock instead of a shared one.
    #[arg(short = 'x', long)]
    pub exclusive: bool,

    /// Program to run, followed by its arguments.
    #[arg(required = true, last = true, num_args = 1..)]
    pub command: Vec<String>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
