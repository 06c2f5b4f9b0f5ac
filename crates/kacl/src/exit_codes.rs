//! Exit codes for the CLI

use kacl_core::ChangelogError;

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Version error
pub const VERSION_ERROR: i32 = 4;

/// Validation error
pub const VALIDATION_ERROR: i32 = 5;

/// User cancelled
pub const CANCELLED: i32 = 130;

/// Exit code for an error returned by a command
pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<ChangelogError>() {
        return match err {
            ChangelogError::MissingConfig { .. }
            | ChangelogError::UnknownConfigField(_)
            | ChangelogError::Config(_)
            | ChangelogError::Template(_) => CONFIG_ERROR,
            ChangelogError::Parse(_) | ChangelogError::Validation(_) => VALIDATION_ERROR,
            ChangelogError::Version(_) | ChangelogError::ReleaseExists(_) => VERSION_ERROR,
            _ => ERROR,
        };
    }
    if let Some(dialoguer::Error::IO(io)) = err.downcast_ref::<dialoguer::Error>() {
        if io.kind() == std::io::ErrorKind::Interrupted {
            return CANCELLED;
        }
    }
    ERROR
}
