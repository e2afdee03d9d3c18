//! Cross-process activation coordinator.
//!
//! Decides, on each activation trigger, whether to launch, show or hide the
//! helper process, and ships the source application to it over the
//! activation channel exactly once per activation cycle.
//!
//! The coordinator never knows whether the helper window is visible. It
//! only knows whether the helper was the foreground process at the moment
//! it asked, and sends the command that flips that. The helper stays the
//! authority on its own state.
//!
//! # Flow
//!
//! ```text
//! hotkey fired ─▶ TriggerGuard ─▶ HotkeyDispatcher ─▶ Coordinator
//!                  (composing?      (spawn on the        │
//!                   NotHandled)      main context)       ├─ capture SourceContext
//!                                                        ├─ ProcessRegistry snapshot
//!                                                        ├─ launch / activate
//!                                                        └─ (delay) publish
//! ```
//!
//! Everything runs on one thread: operations borrow a [`CoordinatorState`]
//! that is deliberately `!Sync`, and the dispatcher uses `spawn_local`.

mod alert;
mod config;
mod coordinator;
mod dispatch;
mod error;
mod locate;
mod state;

pub use alert::{
    AlertPresenter, AlertPresenterRef, LogPresenter, PlatformPresenter, Severity, UserAlert,
    ALERT_TITLE,
};
pub use config::{CoordinatorConfig, TriggerMode};
pub use coordinator::{Collaborators, Coordinator, Outcome};
pub use dispatch::HotkeyDispatcher;
pub use error::{ConfigError, CoordinatorError};
pub use locate::{bundle_root_from_exe, current_bundle_root, HelperLocation, DEFAULT_HELPER_RELATIVE_PATH};
pub use state::CoordinatorState;

#[cfg(target_os = "macos")]
pub use alert::OsascriptPresenter;
