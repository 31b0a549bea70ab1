//! Exit code constants for the repolock CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, uninitialized repository, bad config)
//! - 2: Store I/O failure
//! - 3: User identity could not be resolved
//! - 4: Repository already locked
//! - 5: Command run under the lock failed

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or invalid repository state.
pub const USER_ERROR: i32 = 1;

/// Store failure: a list/save/load/remove call on the lock store failed.
pub const STORE_FAILURE: i32 = 2;

/// Identity failure: the numeric user or group id could not be parsed.
pub const IDENTITY_FAILURE: i32 = 3;

/// Lock failure: a conflicting lock is held.
pub const LOCK_FAILURE: i32 = 4;

/// Command failure: the program run by `exec` exited unsuccessfully.
pub const COMMAND_FAILURE: i32 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            USER_ERROR,
            STORE_FAILURE,
            IDENTITY_FAILURE,
            LOCK_FAILURE,
            COMMAND_FAILURE,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn success_is_zero() {
        assert_eq!(SUCCESS, 0);
    }
}
