//! Error types for repolock.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for repolock operations.
///
/// Each variant maps to a specific exit code in [`exit_codes`].
#[derive(Error, Debug)]
pub enum RepoLockError {
    /// User provided invalid arguments or the repository is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// The current user was found but its numeric ids could not be parsed.
    #[error("Failed to resolve user identity: {0}")]
    IdentityError(String),

    /// A conflicting lock is held by another process.
    #[error("repository is already locked: {0}")]
    AlreadyLocked(String),

    /// A store list/save/load/remove call failed.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// A command run under a lock exited unsuccessfully.
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl RepoLockError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            RepoLockError::UserError(_) => exit_codes::USER_ERROR,
            RepoLockError::StoreError(_) => exit_codes::STORE_FAILURE,
            RepoLockError::IdentityError(_) => exit_codes::IDENTITY_FAILURE,
            RepoLockError::AlreadyLocked(_) => exit_codes::LOCK_FAILURE,
            RepoLockError::CommandFailed(_) => exit_codes::COMMAND_FAILURE,
        }
    }
}

/// Result type alias for repolock operations.
pub type Result<T> = std::result::Result<T, RepoLockError>;
