//! Simulated transports with failure injection.

use npc_env::{validate_topic, EnvError, PayloadEnvelope, TopicPublisher, Transport};
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One payload accepted by a simulated publisher.
#[derive(Debug, Clone)]
pub struct PublishedPayload {
    pub topic: String,
    pub envelope: PayloadEnvelope,
}

/// In-memory transport that records everything published through it.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    /// Every accepted payload, in publish order
    log: Arc<Mutex<Vec<PublishedPayload>>>,

    /// Number of successful `advertise` calls
    advertisements: Arc<AtomicUsize>,

    /// When set, publishers reject every payload
    fail_publish: Arc<AtomicBool>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every publisher (existing and future) fail its sends.
    pub fn set_fail_publish(&self, fail: bool) {
        self.fail_publish.store(fail, Ordering::Relaxed);
    }

    /// Returns a snapshot of everything published so far.
    pub fn published(&self) -> Vec<PublishedPayload> {
        self.log.lock().unwrap().clone()
    }

    /// Returns payloads published on `topic`.
    pub fn published_on(&self, topic: &str) -> Vec<PublishedPayload> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.topic == topic)
            .cloned()
            .collect()
    }

    pub fn advertisements(&self) -> usize {
        self.advertisements.load(Ordering::Relaxed)
    }
}

impl Transport for RecordingTransport {
    type Publisher = RecordingPublisher;

    fn advertise(&self, topic: &str) -> Result<RecordingPublisher, EnvError> {
        validate_topic(topic)?;
        self.advertisements.fetch_add(1, Ordering::Relaxed);
        Ok(RecordingPublisher {
            topic: topic.to_string(),
            log: Arc::clone(&self.log),
            fail_publish: Arc::clone(&self.fail_publish),
        })
    }
}

/// Publisher handed out by [`RecordingTransport`].
pub struct RecordingPublisher {
    topic: String,
    log: Arc<Mutex<Vec<PublishedPayload>>>,
    fail_publish: Arc<AtomicBool>,
}

impl TopicPublisher for RecordingPublisher {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn publish(&self, envelope: PayloadEnvelope) -> Result<(), EnvError> {
        if self.fail_publish.load(Ordering::Relaxed) {
            return Err(EnvError::transport("injected publish failure"));
        }
        self.log.lock().unwrap().push(PublishedPayload {
            topic: self.topic.clone(),
            envelope,
        });
        Ok(())
    }
}

/// Transport writing one JSON line per payload: `{"topic": ..., "stamp_ms": ..., "message": {...}}`.
pub struct JsonLinesTransport<W: Write> {
    out: Arc<Mutex<W>>,
}

impl<W: Write> JsonLinesTransport<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }
}

impl<W: Write + 'static> Transport for JsonLinesTransport<W> {
    type Publisher = JsonLinesPublisher<W>;

    fn advertise(&self, topic: &str) -> Result<JsonLinesPublisher<W>, EnvError> {
        validate_topic(topic)?;
        Ok(JsonLinesPublisher {
            topic: topic.to_string(),
            out: Arc::clone(&self.out),
        })
    }
}

/// Publisher handed out by [`JsonLinesTransport`].
pub struct JsonLinesPublisher<W: Write> {
    topic: String,
    out: Arc<Mutex<W>>,
}

impl<W: Write> TopicPublisher for JsonLinesPublisher<W> {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn publish(&self, envelope: PayloadEnvelope) -> Result<(), EnvError> {
        let message: serde_json::Value = serde_json::from_slice(&envelope.payload)
            .map_err(|e| EnvError::transport(format!("payload is not JSON: {}", e)))?;
        let line = serde_json::json!({
            "topic": self.topic,
            "stamp_ms": envelope.timestamp_ms,
            "message": message,
        });

        let mut out = self
            .out
            .lock()
            .map_err(|_| EnvError::transport("output lock poisoned"))?;
        writeln!(out, "{}", line).map_err(|e| EnvError::transport(e.to_string()))?;
        out.flush().map_err(|e| EnvError::transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    #[test]
    fn test_recording_transport_logs_per_topic() {
        let transport = RecordingTransport::new();
        let a = transport.advertise("/a").unwrap();
        let b = transport.advertise("/b").unwrap();

        a.publish(PayloadEnvelope::json(b"{}".to_vec(), UNIX_EPOCH)).unwrap();
        b.publish(PayloadEnvelope::json(b"[]".to_vec(), UNIX_EPOCH)).unwrap();
        a.publish(PayloadEnvelope::json(b"1".to_vec(), UNIX_EPOCH)).unwrap();

        assert_eq!(transport.advertisements(), 2);
        assert_eq!(transport.published().len(), 3);
        assert_eq!(transport.published_on("/a").len(), 2);
        assert_eq!(transport.published_on("/b")[0].envelope.payload, b"[]");
    }

    #[test]
    fn test_recording_transport_failure_injection() {
        let transport = RecordingTransport::new();
        let publisher = transport.advertise("/a").unwrap();

        transport.set_fail_publish(true);
        let result = publisher.publish(PayloadEnvelope::json(b"{}".to_vec(), UNIX_EPOCH));
        assert!(matches!(result, Err(EnvError::Transport(_))));
        assert!(transport.published().is_empty());

        transport.set_fail_publish(false);
        assert!(publisher
            .publish(PayloadEnvelope::json(b"{}".to_vec(), UNIX_EPOCH))
            .is_ok());
    }

    #[test]
    fn test_empty_topic_rejected() {
        let transport = RecordingTransport::new();
        assert!(matches!(
            transport.advertise(""),
            Err(EnvError::InvalidTopic { .. })
        ));
        assert_eq!(transport.advertisements(), 0);
    }

    #[test]
    fn test_json_lines_output() {
        let transport = JsonLinesTransport::new(Vec::<u8>::new());
        let publisher = transport.advertise("/objects").unwrap();
        publisher
            .publish(PayloadEnvelope::json(br#"{"action":"ADD"}"#.to_vec(), UNIX_EPOCH))
            .unwrap();

        let out = transport.out.lock().unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        let line: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(line["topic"], "/objects");
        assert_eq!(line["stamp_ms"], 0);
        assert_eq!(line["message"]["action"], "ADD");
    }
}
