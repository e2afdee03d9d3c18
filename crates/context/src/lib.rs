//! Source application capture for pluginhost.
//!
//! When the activation hotkey fires, the application that was frontmost
//! *before* the helper takes focus is recorded as a [`SourceContext`] and
//! shipped to the helper process, so the helper knows where to send its
//! results.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                             │
//! │  source.rs   - AppInfo, SourceContext (value types)         │
//! │  provider.rs - ActiveAppProvider trait, NullProvider        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Infrastructure Layer                        │
//! │  platform/macos.rs - NSWorkspace frontmost application      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pluginhost_context::{platform::PlatformProvider, SourceContext};
//!
//! let provider = PlatformProvider::new();
//! let source = SourceContext::capture(&provider);
//! println!("triggered from {} ({})", source.app_name, source.bundle_id);
//! ```

mod provider;
mod source;

pub mod platform;

pub use provider::{ActiveAppProvider, ActiveAppProviderRef, FixedProvider, NullProvider};
pub use source::{AppInfo, SourceContext, PROCESS_ID_SENTINEL, UNKNOWN_APP_NAME};
