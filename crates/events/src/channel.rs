//! Activation channel abstraction.
//!
//! The coordinator only publishes; subscribing is what the helper does on
//! its side. The local channels support both so helper-side handling can
//! be exercised in-process.

use crate::{ActivationMessage, ChannelError, WireMessage};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Callback invoked for each message received on a subscribed topic.
pub type MessageHandler = Arc<dyn Fn(ActivationMessage) + Send + Sync>;

/// Identifies one subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Fire-and-forget broadcast of activation messages.
///
/// Delivery is at-most-once per publish, unordered across topics, and
/// never acknowledged.
pub trait ActivationChannel: Send + Sync {
    /// Broadcast `message` on its topic.
    fn publish(&self, message: &ActivationMessage);

    /// Register `handler` for messages on `topic`.
    fn subscribe(&self, topic: &str, handler: MessageHandler)
        -> Result<SubscriptionId, ChannelError>;

    /// Remove a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Type alias for shared channel reference.
pub type ActivationChannelRef = Arc<dyn ActivationChannel>;

/// A message captured by [`InMemoryChannel`], in both shapes.
#[derive(Debug, Clone)]
pub struct PublishedMessage {
    pub topic: String,
    pub message: ActivationMessage,
    pub payload: Map<String, Value>,
}

struct Subscription {
    id: SubscriptionId,
    topic: String,
    handler: MessageHandler,
}

/// In-process channel that only dispatches.
///
/// Delivers each published message to local subscribers through the wire
/// encoding, so subscribers see exactly what a remote helper would decode.
/// Nothing is retained after `publish` returns. Handlers run synchronously
/// inside `publish`.
#[derive(Default)]
pub struct LocalChannel {
    subscriptions: Mutex<Vec<Subscription>>,
    next_id: AtomicU64,
}

impl LocalChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn deliver(&self, topic: &str, payload: &Map<String, Value>) {
        // Clone handlers out so a handler may publish or unsubscribe.
        let handlers: Vec<MessageHandler> = self
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.topic == topic)
            .map(|s| Arc::clone(&s.handler))
            .collect();

        if handlers.is_empty() {
            return;
        }

        match ActivationMessage::from_wire(topic, payload.clone()) {
            Ok(message) => {
                for handler in handlers {
                    handler(message.clone());
                }
            }
            Err(e) => tracing::warn!(topic, error = %e, "dropping undecodable activation message"),
        }
    }
}

fn encode(message: &ActivationMessage) -> Option<WireMessage> {
    message
        .to_wire()
        .inspect_err(|e| {
            tracing::warn!(topic = message.topic(), error = %e, "failed to encode activation message")
        })
        .ok()
}

impl ActivationChannel for LocalChannel {
    fn publish(&self, message: &ActivationMessage) {
        if let Some(wire) = encode(message) {
            self.deliver(wire.topic, &wire.payload);
        }
    }

    fn subscribe(
        &self,
        topic: &str,
        handler: MessageHandler,
    ) -> Result<SubscriptionId, ChannelError> {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscription {
                id,
                topic: topic.to_string(),
                handler,
            });
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|s| s.id != id);
    }
}

/// [`LocalChannel`] that also records every published message.
///
/// The record grows with each publish and is only dropped by [`clear`];
/// meant for tests and inspection, not for long-running processes.
///
/// [`clear`]: InMemoryChannel::clear
#[derive(Default)]
pub struct InMemoryChannel {
    published: Mutex<Vec<PublishedMessage>>,
    local: LocalChannel,
}

impl InMemoryChannel {
    /// Create a new in-memory channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all published messages.
    pub fn messages(&self) -> Vec<PublishedMessage> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get messages published on a specific topic.
    pub fn messages_for(&self, topic: &str) -> Vec<PublishedMessage> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|m| m.topic == topic)
            .cloned()
            .collect()
    }

    /// Forget all recorded messages.
    pub fn clear(&self) {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of recorded messages.
    pub fn len(&self) -> usize {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.local.subscriber_count()
    }
}

impl ActivationChannel for InMemoryChannel {
    fn publish(&self, message: &ActivationMessage) {
        let Some(wire) = encode(message) else {
            return;
        };

        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PublishedMessage {
                topic: wire.topic.to_string(),
                message: message.clone(),
                payload: wire.payload.clone(),
            });

        self.local.deliver(wire.topic, &wire.payload);
    }

    fn subscribe(
        &self,
        topic: &str,
        handler: MessageHandler,
    ) -> Result<SubscriptionId, ChannelError> {
        self.local.subscribe(topic, handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.local.unsubscribe(id);
    }
}

/// No-op channel that discards all messages.
pub struct NullChannel;

impl ActivationChannel for NullChannel {
    fn publish(&self, _message: &ActivationMessage) {}

    fn subscribe(
        &self,
        _topic: &str,
        _handler: MessageHandler,
    ) -> Result<SubscriptionId, ChannelError> {
        Err(ChannelError::Unsupported("null channel has no subscribers"))
    }

    fn unsubscribe(&self, _id: SubscriptionId) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic_names;
    use pluginhost_context::SourceContext;

    #[test]
    fn test_in_memory_channel_records() {
        let channel = InMemoryChannel::new();

        channel.publish(&ActivationMessage::set_source_context(SourceContext::unknown()));
        channel.publish(&ActivationMessage::toggle(SourceContext::unknown(), true));
        channel.publish(&ActivationMessage::toggle(SourceContext::unknown(), false));

        assert_eq!(channel.len(), 3);
        assert_eq!(
            channel.messages_for(topic_names::TOGGLE_PLUGIN_HOST_WINDOW).len(),
            2
        );
        assert_eq!(
            channel.messages_for(topic_names::SET_SOURCE_APPLICATION).len(),
            1
        );
        assert_eq!(channel.messages_for("test:missing").len(), 0);
    }

    #[test]
    fn test_in_memory_channel_clear() {
        let channel = InMemoryChannel::new();

        channel.publish(&ActivationMessage::toggle(SourceContext::unknown(), true));
        assert!(!channel.is_empty());

        channel.clear();
        assert!(channel.is_empty());
    }

    #[test]
    fn test_subscriber_receives_only_its_topic() {
        let channel = InMemoryChannel::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);

        channel
            .subscribe(
                topic_names::TOGGLE_PLUGIN_HOST_WINDOW,
                Arc::new(move |message| sink.lock().unwrap().push(message)),
            )
            .unwrap();

        channel.publish(&ActivationMessage::set_source_context(SourceContext::unknown()));
        channel.publish(&ActivationMessage::toggle(SourceContext::unknown(), false));

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(
            received[0],
            ActivationMessage::toggle(SourceContext::unknown(), false)
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let channel = InMemoryChannel::new();
        let count = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&count);

        let id = channel
            .subscribe(
                topic_names::SET_SOURCE_APPLICATION,
                Arc::new(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
        assert_eq!(channel.subscriber_count(), 1);

        channel.publish(&ActivationMessage::set_source_context(SourceContext::unknown()));
        channel.unsubscribe(id);
        channel.publish(&ActivationMessage::set_source_context(SourceContext::unknown()));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(channel.subscriber_count(), 0);
        // Publishing is still recorded without subscribers.
        assert_eq!(channel.len(), 2);
    }

    #[test]
    fn test_local_channel_dispatches_without_recording() {
        let channel = LocalChannel::new();
        let count = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&count);

        channel
            .subscribe(
                topic_names::TOGGLE_PLUGIN_HOST_WINDOW,
                Arc::new(move |message| {
                    assert_eq!(
                        message,
                        ActivationMessage::toggle(SourceContext::unknown(), true)
                    );
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        for _ in 0..1000 {
            channel.publish(&ActivationMessage::toggle(SourceContext::unknown(), true));
        }
        channel.publish(&ActivationMessage::set_source_context(SourceContext::unknown()));

        assert_eq!(count.load(Ordering::SeqCst), 1000);
        assert_eq!(channel.subscriber_count(), 1);
    }

    #[test]
    fn test_null_channel() {
        let channel = NullChannel;
        // Should not panic
        channel.publish(&ActivationMessage::toggle(SourceContext::unknown(), true));
        assert!(channel
            .subscribe("any", Arc::new(|_| {}))
            .is_err());
    }
}
