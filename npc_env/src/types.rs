//! Common types for the environment abstraction.

use crate::context::ToolContext;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// 128-bit identifier of a dummy object.
///
/// The bytes are drawn uniformly at random; version and variant bits are
/// left as drawn, so this is not guaranteed to parse as a v4 UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    /// Draws a fresh identifier from the context's entropy source.
    pub fn generate<Ctx: ToolContext + ?Sized>(ctx: &Ctx) -> Self {
        let mut bytes = [0u8; 16];
        ctx.fill_id_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    /// Creates an ObjectId from raw bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Returns the raw 16 bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Show first 8 chars for readability
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// How the payload bytes are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadEncoding {
    Json,
}

/// Envelope handed to a transport.
///
/// The payload is opaque to the transport; only the tools and their
/// subscribers know how to decode it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadEnvelope {
    /// The encoded message bytes
    pub payload: Vec<u8>,

    /// Header stamp of the enclosed message (Unix milliseconds)
    pub timestamp_ms: u64,

    /// Encoding of `payload`
    pub encoding: PayloadEncoding,
}

impl PayloadEnvelope {
    /// Creates a JSON envelope stamped at `stamp`.
    pub fn json(payload: Vec<u8>, stamp: SystemTime) -> Self {
        let timestamp_ms = stamp
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            payload,
            timestamp_ms,
            encoding: PayloadEncoding::Json,
        }
    }
}
