//! Process registry and launcher for the helper process.
//!
//! The coordinator only ever learns about the helper through OS-exposed
//! signals: is a process with the helper's identity running, and is it the
//! foreground process right now. Both answers are snapshots; nothing here
//! caches them.
//!
//! Platform adapters live in [`platform`]:
//! - macOS talks to `NSRunningApplication` and launches through `open`;
//! - other platforms read the `sysinfo` process table and spawn the helper
//!   executable directly.

mod error;

pub mod platform;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub use error::LaunchError;

/// Default bundle identifier of the helper process.
pub const DEFAULT_HELPER_IDENTITY: &str = "im.rime.plugin.host";

/// How long a launcher waits for a freshly started helper to show up in
/// the process table. A cold start after login or an update can take
/// several seconds before the bundle registers.
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Stable identifier naming the helper process (a bundle id on macOS,
/// a process name elsewhere).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HelperIdentity(String);

impl HelperIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HelperIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_HELPER_IDENTITY)
    }
}

impl fmt::Display for HelperIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HelperIdentity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Snapshot of a running process matching a [`HelperIdentity`].
///
/// Only valid at the moment it was produced; the process may exit or
/// change state immediately afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pub identity: HelperIdentity,
    pub pid: u32,
}

impl ProcessHandle {
    pub fn new(identity: HelperIdentity, pid: u32) -> Self {
        Self { identity, pid }
    }
}

/// Read-only view of the OS process table.
pub trait ProcessRegistry: Send + Sync {
    /// Find a running process matching `identity`.
    ///
    /// "Not running" is `None`, never an error.
    fn find_running(&self, identity: &HelperIdentity) -> Option<ProcessHandle>;

    /// Whether `handle` is the active (foreground) process at call time.
    fn is_foreground_active(&self, handle: &ProcessHandle) -> bool;
}

/// Shared registry reference.
pub type ProcessRegistryRef = Arc<dyn ProcessRegistry>;

/// Options for starting the helper.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Ask the OS to bring the new process to the foreground.
    pub activate_on_launch: bool,
    /// How long to wait for the started process to become visible.
    pub startup_timeout: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            activate_on_launch: true,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
        }
    }
}

/// Which windows an activation brings forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationScope {
    /// Every window of the process, ignoring other apps.
    AllWindows,
    /// The process's key window only, ignoring other apps.
    KeyWindow,
}

/// Starts, activates and terminates the helper process.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Start the process at `path`, expected to register as `identity`.
    async fn launch(
        &self,
        path: &Path,
        identity: &HelperIdentity,
        options: &LaunchOptions,
    ) -> Result<ProcessHandle, LaunchError>;

    /// Force the process to the foreground.
    ///
    /// Returns `false` if the OS refused or the process is gone.
    fn activate(&self, handle: &ProcessHandle, scope: ActivationScope) -> bool;

    /// Politely ask the process to quit.
    ///
    /// Returns `false` if the process could not be found.
    fn terminate(&self, handle: &ProcessHandle) -> bool;
}

/// Shared launcher reference.
pub type ProcessLauncherRef = Arc<dyn ProcessLauncher>;

/// Poll `registry` until `identity` appears or `timeout` elapses.
pub async fn wait_for_process(
    registry: &dyn ProcessRegistry,
    identity: &HelperIdentity,
    timeout: Duration,
) -> Option<ProcessHandle> {
    const POLL_INTERVAL: Duration = Duration::from_millis(50);

    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if let Some(handle) = registry.find_running(identity) {
            return Some(handle);
        }
        if tokio::time::Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
