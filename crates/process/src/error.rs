//! Error types for launching the helper.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while starting the helper process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Nothing exists at the requested path.
    #[error("helper not found at {}", path.display())]
    NotFound { path: PathBuf },

    /// The OS refused to start the process.
    #[error("{message}")]
    OsRejected { message: String },
}

impl LaunchError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::OsRejected {
            message: message.into(),
        }
    }
}
