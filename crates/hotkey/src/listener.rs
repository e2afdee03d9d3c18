//! Global activation hotkey listener.
//!
//! Polls global key state and emits one [`HotkeyFired`] per chord press
//! (rising edge). Polling keeps the listener off the main thread without
//! installing an event tap; at 30ms it catches any human key press while
//! using negligible CPU.
//!
//! The listener thread only sends events. Everything that reacts to them
//! runs on the receiver's side.

use crate::error::HotkeyError;
use device_query::{DeviceQuery, DeviceState, Keycode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Polling interval for key state.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(30);

/// Modifier keys, matched on either side of the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Command,
    Shift,
    Control,
    Option,
}

impl Modifier {
    fn keycodes(self) -> [Keycode; 2] {
        match self {
            Modifier::Command => [Keycode::LMeta, Keycode::RMeta],
            Modifier::Shift => [Keycode::LShift, Keycode::RShift],
            Modifier::Control => [Keycode::LControl, Keycode::RControl],
            Modifier::Option => [Keycode::LAlt, Keycode::RAlt],
        }
    }
}

/// Chord and polling settings for the listener.
#[derive(Debug, Clone)]
pub struct HotkeyConfig {
    pub modifiers: Vec<Modifier>,
    pub key: Keycode,
    pub poll_interval: Duration,
}

impl Default for HotkeyConfig {
    /// Cmd+Shift+Space
    fn default() -> Self {
        Self {
            modifiers: vec![Modifier::Command, Modifier::Shift],
            key: Keycode::Space,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// A single fired hotkey. Carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyFired;

/// Whether `keys` (currently held) satisfy the configured chord.
pub fn chord_pressed(config: &HotkeyConfig, keys: &[Keycode]) -> bool {
    keys.contains(&config.key)
        && config
            .modifiers
            .iter()
            .all(|m| m.keycodes().iter().any(|k| keys.contains(k)))
}

/// Handle to control the hotkey listener.
///
/// Dropping the handle stops the listener.
pub struct HotkeyHandle {
    running: Arc<AtomicBool>,
}

impl HotkeyHandle {
    /// Stop the hotkey listener.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the listener is still running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for HotkeyHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start the global hotkey listener.
///
/// Spawns a background thread that polls global key state and sends a
/// [`HotkeyFired`] on `events` each time the chord goes down. The thread
/// exits when the handle is stopped or the receiver is dropped.
pub fn start_hotkey_listener(
    config: HotkeyConfig,
    events: UnboundedSender<HotkeyFired>,
) -> Result<HotkeyHandle, HotkeyError> {
    #[cfg(target_os = "macos")]
    if !crate::macos::has_accessibility_access() {
        return Err(HotkeyError::AccessibilityNotGranted);
    }

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    std::thread::Builder::new()
        .name("pluginhost-hotkey".into())
        .spawn(move || {
            let device_state = DeviceState::new();
            let mut was_pressed = false;

            tracing::info!(
                modifiers = ?config.modifiers,
                key = ?config.key,
                "hotkey listener started"
            );

            while running_clone.load(Ordering::SeqCst) {
                let is_pressed = chord_pressed(&config, &device_state.get_keys());

                // Detect Rising Edge (Press)
                if is_pressed && !was_pressed {
                    tracing::trace!("activation hotkey pressed");
                    if events.send(HotkeyFired).is_err() {
                        tracing::debug!("hotkey receiver dropped");
                        break;
                    }
                }

                was_pressed = is_pressed;
                std::thread::sleep(config.poll_interval);
            }

            running_clone.store(false, Ordering::SeqCst);
            tracing::info!("hotkey listener stopped");
        })
        .map_err(HotkeyError::SpawnFailed)?;

    Ok(HotkeyHandle { running })
}
