//! Payload codec for dummy object messages.

use crate::error::ToolError;
use crate::messages::Object;
use npc_env::{PayloadEncoding, PayloadEnvelope};
use std::time::{Duration, UNIX_EPOCH};

/// Wraps an object into a JSON envelope stamped with its header time.
pub fn encode_object(object: &Object) -> Result<PayloadEnvelope, ToolError> {
    let payload = serde_json::to_vec(object)?;
    let stamp = UNIX_EPOCH
        + Duration::new(
            object.header.stamp.sec.max(0) as u64,
            object.header.stamp.nanosec,
        );
    Ok(PayloadEnvelope::json(payload, stamp))
}

/// Decodes an envelope produced by [`encode_object`].
pub fn decode_object(envelope: &PayloadEnvelope) -> Result<Object, ToolError> {
    match envelope.encoding {
        PayloadEncoding::Json => Ok(serde_json::from_slice(&envelope.payload)?),
    }
}
