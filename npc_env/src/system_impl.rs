//! Production implementation of ToolContext.

use crate::ToolContext;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;
use std::time::SystemTime;

/// Default fixed frame of the visualization host.
pub const DEFAULT_FIXED_FRAME: &str = "map";

/// Production context backed by the system clock and OS entropy.
///
/// This is the "real" implementation used when the tools run against a live
/// simulator. Every identifier comes from a generator freshly seeded from the
/// OS, so nothing links consecutive ids.
#[derive(Debug, Clone)]
pub struct SystemContext {
    /// Fixed frame reported to the tools
    fixed_frame: String,
}

impl SystemContext {
    /// Creates a context reporting the given fixed frame.
    pub fn new(fixed_frame: impl Into<String>) -> Self {
        Self {
            fixed_frame: fixed_frame.into(),
        }
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared(fixed_frame: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(fixed_frame))
    }
}

impl Default for SystemContext {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_FRAME)
    }
}

impl ToolContext for SystemContext {
    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }

    fn fixed_frame(&self) -> String {
        self.fixed_frame.clone()
    }

    fn fill_id_bytes(&self, dest: &mut [u8]) {
        let mut rng = StdRng::from_entropy();
        rng.fill_bytes(dest);
    }
}
