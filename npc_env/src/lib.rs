//! NPC Tools Environment Abstraction Layer
//!
//! This crate provides the seams between the pose tools and their host:
//! - Context (`system_time()`, `fixed_frame()`, `fill_id_bytes()`)
//! - Transport (`advertise()` a topic, `publish()` on it)
//!
//! The production context reads the wall clock and draws identifier bytes
//! from OS entropy. A simulation context can replace both with a virtual
//! clock and a seeded stream, so every published message is reproducible.
//!
//! # Example
//!
//! ```ignore
//! use npc_env::{ToolContext, Transport, TopicPublisher, PayloadEnvelope};
//!
//! fn announce<Ctx: ToolContext, T: Transport>(ctx: &Ctx, transport: &T) {
//!     let publisher = transport.advertise("/simulation/npc_simulator/object_info")?;
//!     let stamp = ctx.system_time();
//!     publisher.publish(PayloadEnvelope::json(payload, stamp))?;
//! }
//! ```

mod context;
mod error;
mod system_impl;
mod transport;
mod types;

pub use context::ToolContext;
pub use error::EnvError;
pub use system_impl::{SystemContext, DEFAULT_FIXED_FRAME};
pub use transport::{validate_topic, TopicPublisher, Transport};
pub use types::{ObjectId, PayloadEncoding, PayloadEnvelope};
