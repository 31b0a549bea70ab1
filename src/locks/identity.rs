//! Best-effort resolution of the creating machine and user.

use crate::error::{RepoLockError, Result};

/// Raw user identity as reported by the operating system.
///
/// The numeric ids are kept as the strings the lookup produced; they are
/// only validated by [`UserInfo::parse_ids`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub username: String,
    pub uid: String,
    pub gid: String,
}

impl UserInfo {
    /// Parse the numeric user and group ids.
    ///
    /// A user that was found but whose ids are not numbers is an
    /// [`RepoLockError::IdentityError`].
    pub fn parse_ids(&self) -> Result<(u32, u32)> {
        let uid = parse_id("uid", &self.uid)?;
        let gid = parse_id("gid", &self.gid)?;
        Ok((uid, gid))
    }
}

fn parse_id(what: &str, raw: &str) -> Result<u32> {
    raw.trim().parse::<u32>().map_err(|e| {
        RepoLockError::IdentityError(format!("{} '{}' is not a valid number: {}", what, raw, e))
    })
}

/// Look up the current user. Returns `None` when no user name is available.
#[cfg(unix)]
pub fn current_user() -> Option<UserInfo> {
    let username = username_from_env()?;
    // SAFETY: getuid/getgid take no arguments, cannot fail, and touch no memory.
    let (uid, gid) = unsafe { (libc::getuid(), libc::getgid()) };
    Some(UserInfo {
        username,
        uid: uid.to_string(),
        gid: gid.to_string(),
    })
}

/// Look up the current user. Returns `None` when no user name is available.
#[cfg(not(unix))]
pub fn current_user() -> Option<UserInfo> {
    let username = username_from_env()?;
    Some(UserInfo {
        username,
        uid: "0".to_string(),
        gid: "0".to_string(),
    })
}

fn username_from_env() -> Option<String> {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|name| !name.is_empty())
}

/// Hostname of this machine, if it can be determined.
pub fn current_hostname() -> Option<String> {
    hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().to_string())
}
