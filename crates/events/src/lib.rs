//! Activation messages exchanged between the primary and helper processes.
//!
//! This crate defines the two message kinds the coordinator sends to the
//! helper, the flat key/value wire format they travel in, and the
//! [`ActivationChannel`] trait for broadcasting them.
//!
//! Messages are strongly typed on both sides of the channel; conversion to
//! and from the untyped wire mapping happens only at the channel boundary
//! ([`ActivationMessage::to_wire`] / [`ActivationMessage::from_wire`]).

mod channel;
mod error;

pub mod platform;

pub use channel::{
    ActivationChannel, ActivationChannelRef, InMemoryChannel, LocalChannel, MessageHandler,
    NullChannel, PublishedMessage, SubscriptionId,
};
pub use error::ChannelError;

use pluginhost_context::SourceContext;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tell the helper which application it was summoned from.
///
/// Producers: coordinator (after launching the helper)
/// Consumers: helper process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetContextCommand {
    #[serde(flatten)]
    pub source: SourceContext,
}

/// Ask the helper to show or hide its window.
///
/// Producers: coordinator (helper already running)
/// Consumers: helper process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleCommand {
    #[serde(flatten)]
    pub source: SourceContext,
    pub should_hide: bool,
}

/// Envelope over every message kind the channel carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationMessage {
    SetSourceContext(SetContextCommand),
    ToggleVisibility(ToggleCommand),
}

/// A message in its on-the-wire shape: topic name plus flat mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct WireMessage {
    pub topic: &'static str,
    pub payload: Map<String, Value>,
}

impl ActivationMessage {
    pub fn set_source_context(source: SourceContext) -> Self {
        Self::SetSourceContext(SetContextCommand { source })
    }

    pub fn toggle(source: SourceContext, should_hide: bool) -> Self {
        Self::ToggleVisibility(ToggleCommand {
            source,
            should_hide,
        })
    }

    /// Topic this message is broadcast on.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::SetSourceContext(_) => topic_names::SET_SOURCE_APPLICATION,
            Self::ToggleVisibility(_) => topic_names::TOGGLE_PLUGIN_HOST_WINDOW,
        }
    }

    /// The source application carried by every message kind.
    pub fn source(&self) -> &SourceContext {
        match self {
            Self::SetSourceContext(cmd) => &cmd.source,
            Self::ToggleVisibility(cmd) => &cmd.source,
        }
    }

    /// Serialize into the flat wire mapping.
    pub fn to_wire(&self) -> Result<WireMessage, ChannelError> {
        let value = match self {
            Self::SetSourceContext(cmd) => serde_json::to_value(cmd),
            Self::ToggleVisibility(cmd) => serde_json::to_value(cmd),
        }
        .map_err(ChannelError::Encode)?;

        match value {
            Value::Object(payload) => Ok(WireMessage {
                topic: self.topic(),
                payload,
            }),
            other => Err(ChannelError::NotAMapping(other.to_string())),
        }
    }

    /// Parse a received wire mapping back into a typed message.
    pub fn from_wire(topic: &str, payload: Map<String, Value>) -> Result<Self, ChannelError> {
        let value = Value::Object(payload);
        let decode = |source| ChannelError::Decode {
            topic: topic.to_string(),
            source,
        };

        match topic {
            topic_names::SET_SOURCE_APPLICATION => serde_json::from_value(value)
                .map(Self::SetSourceContext)
                .map_err(decode),
            topic_names::TOGGLE_PLUGIN_HOST_WINDOW => serde_json::from_value(value)
                .map(Self::ToggleVisibility)
                .map_err(decode),
            other => Err(ChannelError::UnknownTopic(other.to_string())),
        }
    }
}

/// Topic names as constants to prevent typos.
///
/// These are broadcast system-wide; any process that knows the name
/// receives the message.
pub mod topic_names {
    /// Source application for a freshly launched helper.
    pub const SET_SOURCE_APPLICATION: &str = "SetSourceApplication";
    /// Show/hide request for an already running helper.
    pub const TOGGLE_PLUGIN_HOST_WINDOW: &str = "TogglePluginHostWindow";
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluginhost_context::AppInfo;
    use serde_json::json;

    fn finder() -> SourceContext {
        SourceContext::from_app(Some(AppInfo::new("com.apple.finder", "Finder", 123)))
    }

    #[test]
    fn test_set_source_wire_shape() {
        let wire = ActivationMessage::set_source_context(finder()).to_wire().unwrap();
        assert_eq!(wire.topic, "SetSourceApplication");
        assert_eq!(
            Value::Object(wire.payload),
            json!({
                "sourceAppName": "Finder",
                "sourceAppBundleId": "com.apple.finder",
                "sourceAppProcessId": 123
            })
        );
    }

    #[test]
    fn test_toggle_wire_shape() {
        let wire = ActivationMessage::toggle(SourceContext::unknown(), true)
            .to_wire()
            .unwrap();
        assert_eq!(wire.topic, "TogglePluginHostWindow");
        assert_eq!(
            Value::Object(wire.payload),
            json!({
                "sourceAppName": "Unknown",
                "sourceAppBundleId": "",
                "sourceAppProcessId": -1,
                "shouldHide": true
            })
        );
    }

    #[test]
    fn test_toggle_from_helper_payload() {
        let payload = json!({
            "sourceAppName": "Notes",
            "sourceAppBundleId": "com.apple.Notes",
            "sourceAppProcessId": 812,
            "shouldHide": false
        });
        let Value::Object(payload) = payload else {
            unreachable!()
        };

        let message = ActivationMessage::from_wire("TogglePluginHostWindow", payload).unwrap();
        let ActivationMessage::ToggleVisibility(cmd) = message else {
            panic!("expected toggle, got {message:?}");
        };
        assert!(!cmd.should_hide);
        assert_eq!(cmd.source.app_name, "Notes");
        assert_eq!(cmd.source.process_id, Some(812));
    }

    #[test]
    fn test_toggle_missing_should_hide_rejected() {
        let mut payload = Map::new();
        payload.insert("sourceAppName".into(), json!("Notes"));

        let err = ActivationMessage::from_wire("TogglePluginHostWindow", payload).unwrap_err();
        assert!(matches!(err, ChannelError::Decode { .. }));
    }

    #[test]
    fn test_unknown_topic() {
        let err = ActivationMessage::from_wire("SquirrelReloadNotification", Map::new()).unwrap_err();
        assert!(matches!(err, ChannelError::UnknownTopic(t) if t == "SquirrelReloadNotification"));
    }
}
