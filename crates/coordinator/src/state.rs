//! Process-wide coordinator state.

use pluginhost_events::{ActivationChannel, SubscriptionId};
use pluginhost_hotkey::HotkeyHandle;
use std::cell::{Cell, RefCell};

/// Context object threaded through every coordinator operation.
///
/// Created once at process start and torn down once at shutdown. Interior
/// mutability is `Cell`/`RefCell`: the state belongs to the main context and
/// is never shared across threads.
#[derive(Default)]
pub struct CoordinatorState {
    /// Best-effort cache. Diagnostic only; never gates a decision.
    helper_observed_running: Cell<bool>,
    hotkey: RefCell<Option<HotkeyHandle>>,
    subscriptions: RefCell<Vec<SubscriptionId>>,
}

impl CoordinatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a helper was started or seen by the most recent operation.
    pub fn helper_observed_running(&self) -> bool {
        self.helper_observed_running.get()
    }

    pub(crate) fn set_helper_observed_running(&self, running: bool) {
        self.helper_observed_running.set(running);
    }

    /// Retain the installed hotkey listener until teardown.
    ///
    /// A previously installed listener is stopped.
    pub fn install_hotkey(&self, handle: HotkeyHandle) {
        if let Some(previous) = self.hotkey.replace(Some(handle)) {
            previous.stop();
        }
    }

    pub fn has_hotkey(&self) -> bool {
        self.hotkey.borrow().is_some()
    }

    /// Retain a channel subscription until teardown.
    pub fn track_subscription(&self, id: SubscriptionId) {
        self.subscriptions.borrow_mut().push(id);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// Stop the hotkey listener and remove every tracked subscription.
    pub(crate) fn release(&self, channel: &dyn ActivationChannel) {
        if let Some(handle) = self.hotkey.take() {
            handle.stop();
        }
        for id in self.subscriptions.take() {
            channel.unsubscribe(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluginhost_events::InMemoryChannel;
    use std::sync::Arc;

    #[test]
    fn test_release_removes_subscriptions() {
        let channel = InMemoryChannel::new();
        let state = CoordinatorState::new();

        for topic in ["a", "b"] {
            let id = channel.subscribe(topic, Arc::new(|_| {})).unwrap();
            state.track_subscription(id);
        }
        assert_eq!(state.subscription_count(), 2);
        assert_eq!(channel.subscriber_count(), 2);

        state.release(&channel);
        assert_eq!(state.subscription_count(), 0);
        assert_eq!(channel.subscriber_count(), 0);
        assert!(!state.has_hotkey());
    }

    #[test]
    fn test_observed_flag() {
        let state = CoordinatorState::new();
        assert!(!state.helper_observed_running());
        state.set_helper_observed_running(true);
        assert!(state.helper_observed_running());
    }
}
