//! Repository context resolution for repolock.
//!
//! A repository is a directory holding a `config.yaml` and the `locks/`
//! object directory. Commands may be invoked from the repository root, from
//! any directory below it, or with an explicit `--repo` path.

use crate::config::Config;
use crate::error::{RepoLockError, Result};
use crate::store::{FileType, LocalStore};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the repository configuration file.
pub const CONFIG_FILE: &str = "config.yaml";

/// Resolved paths for a repository. All paths are absolute.
#[derive(Debug, Clone)]
pub struct RepoContext {
    /// Repository root directory.
    pub root: PathBuf,

    /// Directory holding lock objects (`{root}/locks/`).
    pub locks_dir: PathBuf,

    /// Path to the repository configuration (`{root}/config.yaml`).
    pub config_path: PathBuf,
}

impl RepoContext {
    /// Resolve the repository from an explicit path, or from the current
    /// working directory when none is given.
    pub fn resolve(repo: Option<&Path>) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            RepoLockError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        match repo {
            Some(path) => Ok(Self::at(cwd.join(path))),
            None => Ok(Self::resolve_from(&cwd)),
        }
    }

    /// Resolve the repository containing `start`.
    ///
    /// Walks up from `start` to the nearest initialized repository. If none
    /// is found, `start` itself is used, so `init` can create one there.
    pub fn resolve_from<P: AsRef<Path>>(start: P) -> Self {
        let start = start.as_ref();
        start
            .ancestors()
            .map(Self::at)
            .find(|ctx| ctx.is_initialized())
            .unwrap_or_else(|| Self::at(start))
    }

    /// Context for a repository rooted exactly at `root`.
    pub fn at<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            locks_dir: root.join(FileType::Lock.as_str()),
            config_path: root.join(CONFIG_FILE),
            root,
        }
    }

    /// Whether the repository layout exists.
    pub fn is_initialized(&self) -> bool {
        self.locks_dir.is_dir() && self.config_path.is_file()
    }

    /// Ensure the repository is initialized, returning an error if not.
    ///
    /// This should be called by all commands except `init`.
    pub fn ensure_initialized(&self) -> Result<()> {
        if !self.is_initialized() {
            return Err(RepoLockError::UserError(format!(
                "no repository found at {}.\n\
                 Expected {} and a {}/ directory.\n\n\
                 Run `repolock init` to initialize a repository here.",
                self.root.display(),
                CONFIG_FILE,
                FileType::Lock.as_str()
            )));
        }
        Ok(())
    }

    /// Object store for this repository.
    pub fn store(&self) -> LocalStore {
        LocalStore::new(&self.root)
    }

    /// Load the repository configuration, using defaults if the file is missing.
    pub fn config(&self) -> Result<Config> {
        Config::load_or_default(&self.config_path)
    }
}

/// Resolve the repository and ensure it is initialized.
pub fn require_initialized_repo(repo: Option<&Path>) -> Result<RepoContext> {
    let ctx = RepoContext::resolve(repo)?;
    ctx.ensure_initialized()?;
    Ok(ctx)
}
