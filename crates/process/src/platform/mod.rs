//! Platform-specific registry and launcher implementations.

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "macos")]
pub use macos::{MacOSLauncher, MacOSRegistry};

#[cfg(target_os = "macos")]
pub type PlatformRegistry = MacOSRegistry;

#[cfg(target_os = "macos")]
pub type PlatformLauncher = MacOSLauncher;

#[cfg(not(target_os = "macos"))]
mod generic;

#[cfg(not(target_os = "macos"))]
pub use generic::{SpawnLauncher, SysinfoRegistry};

#[cfg(not(target_os = "macos"))]
pub type PlatformRegistry = SysinfoRegistry;

#[cfg(not(target_os = "macos"))]
pub type PlatformLauncher = SpawnLauncher;
