//! Error types for the activation channel.

use thiserror::Error;

/// Errors raised at the activation channel boundary.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// A message could not be serialized.
    #[error("failed to encode activation message: {0}")]
    Encode(#[source] serde_json::Error),

    /// A message serialized to something other than a flat mapping.
    #[error("activation message is not a key/value mapping: {0}")]
    NotAMapping(String),

    /// A received payload did not match its topic's message shape.
    #[error("malformed payload on topic '{topic}': {source}")]
    Decode {
        topic: String,
        #[source]
        source: serde_json::Error,
    },

    /// A payload arrived on a topic this crate does not know.
    #[error("unknown activation topic '{0}'")]
    UnknownTopic(String),

    /// The channel implementation cannot perform the operation.
    #[error("operation not supported by this channel: {0}")]
    Unsupported(&'static str),
}
