//! Error types for the coordinator.

use pluginhost_process::LaunchError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of a single trigger.
///
/// None of these are fatal to the primary process; the next trigger
/// starts from a fresh registry query.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The helper bundle does not exist at its resolved location.
    #[error("helper app not installed at {}", path.display())]
    HelperNotInstalled { path: PathBuf },

    /// The OS refused to start the helper.
    #[error("failed to launch helper app: {message}")]
    LaunchRejected { message: String },
}

impl From<LaunchError> for CoordinatorError {
    fn from(e: LaunchError) -> Self {
        match e {
            LaunchError::NotFound { path } => CoordinatorError::HelperNotInstalled { path },
            LaunchError::OsRejected { message } => CoordinatorError::LaunchRejected { message },
        }
    }
}

/// Errors in environment overrides for [`crate::CoordinatorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unknown trigger mode name.
    #[error("invalid trigger mode '{0}' (expected 'ensure' or 'toggle')")]
    InvalidTriggerMode(String),

    /// A delay variable was not a whole number of milliseconds.
    #[error("invalid value for {var}: '{value}' is not a number of milliseconds")]
    InvalidDelay { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_error_mapping() {
        let not_found = CoordinatorError::from(LaunchError::NotFound {
            path: PathBuf::from("/x/Helper.app"),
        });
        assert!(matches!(not_found, CoordinatorError::HelperNotInstalled { .. }));

        let rejected = CoordinatorError::from(LaunchError::rejected("LSOpen -10810"));
        assert_eq!(
            rejected.to_string(),
            "failed to launch helper app: LSOpen -10810"
        );
    }
}
