//! Hotkey → coordinator dispatch on the main context.

use crate::config::TriggerMode;
use crate::coordinator::Coordinator;
use crate::state::CoordinatorState;
use pluginhost_hotkey::{EventDisposition, HotkeyFired, TriggerGuard};
use std::rc::Rc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Runs the configured coordinator operation for each fired hotkey.
///
/// Work is spawned with `spawn_local`, so the dispatcher must be driven
/// from inside a [`tokio::task::LocalSet`].
pub struct HotkeyDispatcher {
    guard: TriggerGuard,
    coordinator: Rc<Coordinator>,
    state: Rc<CoordinatorState>,
    mode: TriggerMode,
}

impl HotkeyDispatcher {
    pub fn new(guard: TriggerGuard, coordinator: Rc<Coordinator>, state: Rc<CoordinatorState>) -> Self {
        let mode = coordinator.config().trigger_mode;
        Self {
            guard,
            coordinator,
            state,
            mode,
        }
    }

    /// Answer a fired hotkey, deferring the coordinator work.
    pub fn on_hotkey_fired(&self) -> EventDisposition {
        match self.trigger() {
            Some(_) => EventDisposition::Handled,
            None => EventDisposition::NotHandled,
        }
    }

    /// Like [`Self::on_hotkey_fired`], returning the spawned task.
    ///
    /// `None` means the guard suppressed the trigger and the coordinator
    /// was not touched.
    pub fn trigger(&self) -> Option<JoinHandle<()>> {
        if self.guard.should_suppress() {
            debug!("hotkey suppressed during composition");
            return None;
        }

        let coordinator = Rc::clone(&self.coordinator);
        let state = Rc::clone(&self.state);
        let mode = self.mode;

        Some(tokio::task::spawn_local(async move {
            let result = match mode {
                TriggerMode::EnsureRunning => coordinator.ensure_helper_running(&state).await,
                TriggerMode::Toggle => coordinator.toggle_helper_window(&state).await,
            };
            match result {
                Ok(outcome) => debug!(?outcome, "hotkey handled"),
                Err(e) => warn!(error = %e, "hotkey activation failed"),
            }
        }))
    }

    /// Dispatch every event from `rx` until the sender side closes.
    pub async fn run(&self, mut rx: UnboundedReceiver<HotkeyFired>) {
        while let Some(HotkeyFired) = rx.recv().await {
            self.on_hotkey_fired();
        }
        debug!("hotkey channel closed");
    }
}
