//! NPC Core - Dummy object tools for the NPC simulator
//!
//! Two interactive tools let an operator drop a synthetic car or pedestrian
//! into a running simulation:
//! 1. **Pick**: the host reports a confirmed planar pose (x, y, heading)
//! 2. **Build**: the pose and the tool's properties become one `Object`
//!    message with a fresh random id, a fixed shape, and a noisy initial state
//! 3. **Publish**: the message goes out once on the configured topic

pub mod codec;
pub mod converter;
pub mod error;
pub mod messages;
pub mod properties;
pub mod tool;
pub mod variant;

// Re-export key types for convenience
pub use codec::{decode_object, encode_object};
pub use converter::{PoseEvent, PoseToMessageConverter};
pub use error::ToolError;
pub use messages::{Action, Object};
pub use properties::{PropertyKey, PropertyValue, ToolProperties, DEFAULT_TOPIC};
pub use tool::{DummyObjectTool, InteractiveTool};
pub use variant::ObjectVariant;
