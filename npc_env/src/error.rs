//! Error types for the environment abstraction.

use thiserror::Error;

/// Errors that can occur while talking to the host or the transport.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Publisher declaration or send failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Topic name cannot be used by the transport
    #[error("Invalid topic '{topic}': {reason}")]
    InvalidTopic { topic: String, reason: String },
}

impl EnvError {
    /// Creates a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates an invalid-topic error.
    pub fn invalid_topic(topic: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTopic {
            topic: topic.into(),
            reason: reason.into(),
        }
    }
}
