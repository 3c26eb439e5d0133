//! Error types for the pose tools.

use npc_env::EnvError;
use thiserror::Error;

/// Errors surfaced by tool configuration and publishing.
///
/// Building a message never fails; these cover everything around it.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Host context or transport failure
    #[error(transparent)]
    Env(#[from] EnvError),

    /// Message could not be encoded or decoded
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Property name not known to the tool
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// Property value has the wrong kind
    #[error("Property '{name}' expects {expected}")]
    PropertyType { name: String, expected: &'static str },

    /// Config file could not be read
    #[error("Config error: {0}")]
    Config(#[from] std::io::Error),
}
