//! Activation hotkey plumbing for pluginhost.
//!
//! Two pieces live here:
//!
//! - [`TriggerGuard`]: swallows a fired hotkey while the input method is
//!   mid-composition, so the same physical keys keep reaching the
//!   composition panel. Suppressed events are reported as
//!   [`EventDisposition::NotHandled`] to let other consumers of the chord
//!   act on them.
//! - [`start_hotkey_listener`]: a polling chord detector that turns key
//!   presses into [`HotkeyFired`] events on a tokio channel.
//!
//! # Example
//!
//! ```ignore
//! use pluginhost_hotkey::{start_hotkey_listener, HotkeyConfig};
//!
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let handle = start_hotkey_listener(HotkeyConfig::default(), tx)?;
//!
//! while let Some(_fired) = rx.recv().await {
//!     // hand the trigger to the coordinator
//! }
//! ```

mod error;
mod listener;

#[cfg(target_os = "macos")]
mod macos;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use error::HotkeyError;
pub use listener::{
    chord_pressed, start_hotkey_listener, HotkeyConfig, HotkeyFired, HotkeyHandle, Modifier,
    DEFAULT_POLL_INTERVAL,
};

/// Trait for asking whether the input method is composing text.
///
/// Owned by the input-composition subsystem; the guard only queries it.
pub trait CompositionState: Send + Sync {
    /// `true` while a composition (candidate panel) is in progress.
    fn is_composing(&self) -> bool;
}

/// Type alias for the composition state.
pub type CompositionStateRef = Arc<dyn CompositionState>;

/// Composition state for hosts without an input method: never composing.
pub struct NotComposing;

impl CompositionState for NotComposing {
    fn is_composing(&self) -> bool {
        false
    }
}

/// Shared flag the composition subsystem flips when its panel shows/hides.
#[derive(Debug, Default)]
pub struct CompositionFlag(AtomicBool);

impl CompositionFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, composing: bool) {
        self.0.store(composing, Ordering::SeqCst);
    }
}

impl CompositionState for CompositionFlag {
    fn is_composing(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What the hotkey source should be told about a fired event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// The trigger was taken; no one else should act on it.
    Handled,
    /// The trigger was ignored; other consumers may act on it.
    NotHandled,
}

/// Gate in front of the coordinator.
#[derive(Clone)]
pub struct TriggerGuard {
    composition: CompositionStateRef,
}

impl TriggerGuard {
    pub fn new(composition: CompositionStateRef) -> Self {
        Self { composition }
    }

    /// Whether a fired hotkey must be swallowed before the coordinator.
    pub fn should_suppress(&self) -> bool {
        self.composition.is_composing()
    }
}

impl Default for TriggerGuard {
    fn default() -> Self {
        Self::new(Arc::new(NotComposing))
    }
}
