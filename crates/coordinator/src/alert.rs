//! User-facing error surface.
//!
//! The coordinator only decides the text and severity of an alert;
//! presenting it is up to the host.

use crate::error::CoordinatorError;
use std::sync::Arc;

/// Title used for every coordinator alert.
pub const ALERT_TITLE: &str = "AI Plugin Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Informational,
    Warning,
    Critical,
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAlert {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl UserAlert {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            title: ALERT_TITLE.to_string(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

impl From<&CoordinatorError> for UserAlert {
    fn from(e: &CoordinatorError) -> Self {
        match e {
            CoordinatorError::HelperNotInstalled { .. } => Self::warning("Helper app not installed"),
            CoordinatorError::LaunchRejected { message } => {
                Self::warning(format!("Failed to launch helper app: {message}"))
            }
        }
    }
}

/// Shows alerts to the user.
pub trait AlertPresenter: Send + Sync {
    fn present(&self, alert: &UserAlert);
}

/// Shared presenter reference.
pub type AlertPresenterRef = Arc<dyn AlertPresenter>;

/// Presenter that only writes the alert to the log.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl LogPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl AlertPresenter for LogPresenter {
    fn present(&self, alert: &UserAlert) {
        match alert.severity {
            Severity::Informational => tracing::info!(title = %alert.title, "{}", alert.message),
            Severity::Warning => tracing::warn!(title = %alert.title, "{}", alert.message),
            Severity::Critical => tracing::error!(title = %alert.title, "{}", alert.message),
        }
    }
}

#[cfg(target_os = "macos")]
mod macos {
    use super::{AlertPresenter, Severity, UserAlert};
    use std::process::Command;

    /// Presenter that shows a modal alert through `osascript`.
    ///
    /// The script is spawned and not waited on; the alert stays up until
    /// the user dismisses it without holding the caller.
    #[derive(Debug, Default)]
    pub struct OsascriptPresenter;

    impl OsascriptPresenter {
        pub fn new() -> Self {
            Self
        }
    }

    impl AlertPresenter for OsascriptPresenter {
        fn present(&self, alert: &UserAlert) {
            let style = match alert.severity {
                Severity::Informational => "informational",
                Severity::Warning => "warning",
                Severity::Critical => "critical",
            };
            let script = format!(
                r#"display alert "{}" message "{}" as {} buttons {{"OK"}} default button "OK""#,
                escape(&alert.title),
                escape(&alert.message),
                style
            );

            if let Err(e) = Command::new("osascript").args(["-e", &script]).spawn() {
                tracing::warn!(error = %e, message = %alert.message, "failed to show alert");
            }
        }
    }

    /// Escape for an AppleScript string literal.
    fn escape(s: &str) -> String {
        s.replace('\\', "\\\\").replace('"', "\\\"")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_escape() {
            assert_eq!(escape(r#"say "hi" \o/"#), r#"say \"hi\" \\o/"#);
        }
    }
}

#[cfg(target_os = "macos")]
pub use macos::OsascriptPresenter;

#[cfg(target_os = "macos")]
pub type PlatformPresenter = OsascriptPresenter;

#[cfg(not(target_os = "macos"))]
pub type PlatformPresenter = LogPresenter;
