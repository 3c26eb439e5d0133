//! Transport abstraction for publishing tool output.

use crate::error::EnvError;
use crate::types::PayloadEnvelope;

/// A pub/sub transport the tools can bind a topic on.
///
/// # Implementations
///
/// - **Production**: zenoh publisher per topic (npc_agent)
/// - **Simulation**: in-memory recorder, JSON lines writer (npc_sim)
///
/// # Binding Flow
///
/// ```text
/// Tool                      Transport                   Subscriber
///   |                           |                            |
///   |-- advertise(topic) ------>|                            |
///   |<-- Publisher -------------|                            |
///   |                           |                            |
///   |-- publisher.publish() --->|-- payload on topic ------->|
/// ```
pub trait Transport {
    /// Handle bound to a single topic.
    type Publisher: TopicPublisher;

    /// Declares a publisher on `topic`.
    ///
    /// # Returns
    /// * `Ok(publisher)` - Publisher bound to the topic
    /// * `Err(EnvError::InvalidTopic)` - The topic name is not usable
    /// * `Err(EnvError::Transport)` - The transport refused the declaration
    fn advertise(&self, topic: &str) -> Result<Self::Publisher, EnvError>;
}

/// A publisher bound to one topic.
pub trait TopicPublisher {
    /// Returns the topic this publisher was declared on.
    fn topic(&self) -> &str;

    /// Publishes one payload.
    ///
    /// Fire-and-forget: success means the transport accepted the payload,
    /// not that anyone received it.
    fn publish(&self, envelope: PayloadEnvelope) -> Result<(), EnvError>;
}

/// Rejects topic names no transport can bind.
pub fn validate_topic(topic: &str) -> Result<(), EnvError> {
    if topic.trim().is_empty() {
        return Err(EnvError::invalid_topic(topic, "topic name is empty"));
    }
    if topic.chars().any(char::is_whitespace) {
        return Err(EnvError::invalid_topic(topic, "topic name contains whitespace"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_topic_accepts_ros_names() {
        assert!(validate_topic("/simulation/npc_simulator/object_info").is_ok());
        assert!(validate_topic("objects").is_ok());
    }

    #[test]
    fn test_validate_topic_rejects_empty_and_spaces() {
        assert!(matches!(
            validate_topic(""),
            Err(EnvError::InvalidTopic { .. })
        ));
        assert!(matches!(
            validate_topic("   "),
            Err(EnvError::InvalidTopic { .. })
        ));
        assert!(matches!(
            validate_topic("/npc objects"),
            Err(EnvError::InvalidTopic { .. })
        ));
    }
}
