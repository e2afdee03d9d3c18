//! Provider traits for frontmost application detection.
//!
//! These traits abstract platform-specific implementations,
//! allowing the coordinator logic to remain pure and testable.

use crate::source::AppInfo;
use std::sync::{Arc, RwLock};

/// Provider for detecting the currently focused application.
pub trait ActiveAppProvider: Send + Sync {
    /// Get the currently focused application.
    ///
    /// Returns `None` when no application is frontmost or the OS
    /// refuses to say.
    fn get_active_app(&self) -> Option<AppInfo>;
}

/// Shared provider reference.
pub type ActiveAppProviderRef = Arc<dyn ActiveAppProvider>;

/// Null implementation for testing or unsupported platforms.
#[derive(Debug, Default)]
pub struct NullProvider;

impl NullProvider {
    pub fn new() -> Self {
        Self
    }
}

impl ActiveAppProvider for NullProvider {
    fn get_active_app(&self) -> Option<AppInfo> {
        None
    }
}

/// Provider that reports a settable application.
///
/// Used by tests and by hosts that learn about focus changes through
/// their own channel (e.g. an input method client switching documents).
#[derive(Debug, Default)]
pub struct FixedProvider {
    app: RwLock<Option<AppInfo>>,
}

impl FixedProvider {
    pub fn new(app: Option<AppInfo>) -> Self {
        Self {
            app: RwLock::new(app),
        }
    }

    /// Replace the reported application.
    pub fn set(&self, app: Option<AppInfo>) {
        if let Ok(mut guard) = self.app.write() {
            *guard = app;
        }
    }
}

impl ActiveAppProvider for FixedProvider {
    fn get_active_app(&self) -> Option<AppInfo> {
        self.app.read().ok().and_then(|guard| guard.clone())
    }
}
