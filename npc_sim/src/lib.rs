//! NPC Tools Simulation Harness
//!
//! This crate provides a controlled environment where the dummy object
//! tools run without a viewer or a live simulator.
//!
//! # Core Principle
//!
//! Everything that would make a run non-reproducible is controlled:
//! - **Time**: Virtual clock advances only when the script says so
//! - **Identifiers**: All id bytes come from a single 64-bit seed
//! - **Transport**: In-memory recorder with publish failure injection
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       ToolSession                        │
//! │  SessionScript ──► DummyObjectTool ──► RecordingTransport│
//! │                         │               / JsonLines      │
//! │                    SimContext                            │
//! │             (virtual clock + ChaCha8 ids)                │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use npc_sim::{SimContext, RecordingTransport, SessionScript, ToolSession};
//!
//! let script = SessionScript::load("session.json")?;
//! let transport = Arc::new(RecordingTransport::new());
//! let mut session = ToolSession::new(script.variant, Default::default(), SimContext::shared(42), transport)?;
//! let report = session.run(&script.events);
//! ```

mod context;
mod exporter;
mod session;
mod transport;

pub use context::SimContext;
pub use exporter::{PlacedObject, SessionExport};
pub use session::{SessionError, SessionEvent, SessionReport, SessionScript, ToolSession};
pub use transport::{
    JsonLinesPublisher, JsonLinesTransport, PublishedPayload, RecordingPublisher,
    RecordingTransport,
};
