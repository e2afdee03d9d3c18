//! `NSDistributedNotificationCenter` publisher.

use crate::{ActivationChannel, ActivationMessage, ChannelError, MessageHandler, SubscriptionId};
use objc::runtime::{Class, Object, NO, YES};
use objc::{msg_send, sel, sel_impl};
use pluginhost_context::platform::cocoa::nsstring;
use serde_json::Value;

/// Broadcasts activation messages as distributed notifications.
///
/// The notification name is the message topic and `userInfo` is the flat
/// wire mapping. Publish-only: observing distributed notifications is the
/// helper's business.
#[derive(Debug, Default, Clone, Copy)]
pub struct DistributedChannel;

impl DistributedChannel {
    pub fn new() -> Self {
        Self
    }
}

impl ActivationChannel for DistributedChannel {
    fn publish(&self, message: &ActivationMessage) {
        let wire = match message.to_wire() {
            Ok(wire) => wire,
            Err(e) => {
                tracing::warn!(topic = message.topic(), error = %e, "failed to encode activation message");
                return;
            }
        };

        if post_notification(wire.topic, &wire.payload).is_none() {
            tracing::warn!(topic = wire.topic, "distributed notification center unavailable");
        }
    }

    fn subscribe(
        &self,
        _topic: &str,
        _handler: MessageHandler,
    ) -> Result<SubscriptionId, ChannelError> {
        Err(ChannelError::Unsupported(
            "distributed channel is publish-only",
        ))
    }

    fn unsubscribe(&self, _id: SubscriptionId) {}
}

fn post_notification(name: &str, payload: &serde_json::Map<String, Value>) -> Option<()> {
    let center_class = Class::get("NSDistributedNotificationCenter")?;
    let dict_class = Class::get("NSMutableDictionary")?;
    let name = nsstring(name)?;

    unsafe {
        let user_info: *mut Object = msg_send![dict_class, dictionary];
        if user_info.is_null() {
            return None;
        }

        for (key, value) in payload {
            let Some(object) = to_foundation(value) else {
                tracing::debug!(key, "skipping payload value with no Foundation equivalent");
                continue;
            };
            let key = nsstring(key)?;
            let _: () = msg_send![user_info, setObject: object forKey: key];
        }

        let center: *mut Object = msg_send![center_class, defaultCenter];
        if center.is_null() {
            return None;
        }
        let nil: *mut Object = std::ptr::null_mut();
        let _: () = msg_send![center, postNotificationName: name
                                              object: nil
                                            userInfo: user_info
                                  deliverImmediately: YES];
    }

    Some(())
}

/// Map a flat wire value onto NSString / NSNumber.
fn to_foundation(value: &Value) -> Option<*mut Object> {
    let number_class = Class::get("NSNumber")?;

    unsafe {
        let object: *mut Object = match value {
            Value::String(s) => return nsstring(s),
            Value::Bool(b) => {
                let flag = if *b { YES } else { NO };
                msg_send![number_class, numberWithBool: flag]
            }
            Value::Number(n) => match n.as_i64() {
                Some(i) => msg_send![number_class, numberWithLongLong: i],
                None => msg_send![number_class, numberWithDouble: n.as_f64()?],
            },
            _ => return None,
        };
        (!object.is_null()).then_some(object)
    }
}
