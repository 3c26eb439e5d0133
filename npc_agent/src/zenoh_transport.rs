//! Zenoh transport: one publisher per tool topic.

use npc_env::{validate_topic, EnvError, PayloadEnvelope, TopicPublisher, Transport};
use zenoh::key_expr::KeyExpr;
use zenoh::pubsub::Publisher;
use zenoh::{Session, Wait};

/// Maps a ROS-style topic onto a zenoh key expression.
///
/// Leading and trailing slashes are dropped (key expressions cannot start
/// or end with one) and the optional prefix is prepended.
pub fn topic_to_key_expr(prefix: Option<&str>, topic: &str) -> String {
    let key = topic.trim().trim_matches('/');
    match prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{}/{}", prefix, key),
        None => key.to_string(),
    }
}

/// Publishes tool output on a zenoh session.
pub struct ZenohTransport {
    session: Session,
    key_prefix: Option<String>,
}

impl ZenohTransport {
    pub fn new(session: Session, key_prefix: Option<String>) -> Self {
        Self {
            session,
            key_prefix,
        }
    }
}

impl Transport for ZenohTransport {
    type Publisher = ZenohPublisher;

    fn advertise(&self, topic: &str) -> Result<ZenohPublisher, EnvError> {
        validate_topic(topic)?;
        let key = topic_to_key_expr(self.key_prefix.as_deref(), topic);
        let key_expr = KeyExpr::try_from(key)
            .map_err(|e| EnvError::invalid_topic(topic, e.to_string()))?;

        // Declaration resolves immediately; no runtime round-trip
        let publisher = self
            .session
            .declare_publisher(key_expr)
            .wait()
            .map_err(|e| EnvError::transport(format!("Zenoh publisher error: {}", e)))?;

        tracing::debug!("Declared zenoh publisher on {}", publisher.key_expr());
        Ok(ZenohPublisher {
            topic: topic.to_string(),
            publisher,
        })
    }
}

/// A declared zenoh publisher.
pub struct ZenohPublisher {
    topic: String,
    publisher: Publisher<'static>,
}

impl TopicPublisher for ZenohPublisher {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn publish(&self, envelope: PayloadEnvelope) -> Result<(), EnvError> {
        self.publisher
            .put(envelope.payload)
            .wait()
            .map_err(|e| EnvError::transport(format!("Zenoh put error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_to_key_expr() {
        assert_eq!(
            topic_to_key_expr(None, "/simulation/npc_simulator/object_info"),
            "simulation/npc_simulator/object_info"
        );
        assert_eq!(topic_to_key_expr(Some("0"), "/objects/"), "0/objects");
        assert_eq!(topic_to_key_expr(Some("/sim/"), "objects"), "sim/objects");
        assert_eq!(topic_to_key_expr(Some(""), "/objects"), "objects");
    }

    #[test]
    fn test_mapped_topics_are_valid_key_exprs() {
        for topic in ["/simulation/npc_simulator/object_info", "objects", "/a/b/"] {
            let key = topic_to_key_expr(Some("rt"), topic);
            assert!(KeyExpr::try_from(key).is_ok());
        }
    }
}
