//! Host context trait for the pose tools.

use std::time::SystemTime;

/// The tool's view of its host.
///
/// In the visualization host this is the display context: it knows the
/// current fixed frame and the clock the node runs on. The tools never reach
/// for globals; everything that would make a message non-reproducible comes
/// through here.
///
/// # Implementations
///
/// - **Production**: `SystemContext` - wall clock, OS-seeded generator per id
/// - **Simulation**: `SimContext` (npc_sim) - virtual clock, seeded ChaCha stream
pub trait ToolContext {
    /// Returns the time used to stamp outgoing message headers.
    fn system_time(&self) -> SystemTime;

    /// Returns the name of the fixed reference frame poses are expressed in.
    fn fixed_frame(&self) -> String;

    /// Fills `dest` with uniformly random bytes for an object identifier.
    ///
    /// Production implementations seed a fresh generator from system entropy
    /// on every call. No uniqueness check is made against earlier ids.
    fn fill_id_bytes(&self, dest: &mut [u8]);

    /// Returns the context's seed (for logging/debugging).
    ///
    /// In production, returns 0 (not seeded).
    fn seed(&self) -> u64 {
        0
    }
}
