//! Error types for the hotkey listener.

use thiserror::Error;

/// Errors that can occur while installing the hotkey listener.
#[derive(Debug, Error)]
pub enum HotkeyError {
    /// Accessibility permission not granted (macOS).
    #[error("accessibility permission not granted - open System Settings > Privacy & Security > Accessibility")]
    AccessibilityNotGranted,

    /// The listener thread could not be started.
    #[error("failed to start hotkey listener: {0}")]
    SpawnFailed(#[source] std::io::Error),
}
