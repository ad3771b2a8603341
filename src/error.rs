//! Error types for the editor core
//!
//! Table operations without a target table or selection are ordinary no-op
//! outcomes and never reach this type. `EditorError` covers malformed input
//! arriving through the command interface or the WASM API, and image calls
//! made before the image has loaded.

use thiserror::Error;

use crate::models::BlockId;

/// Top-level error type for editor commands and API calls
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// Operation name not recognised by the command parser
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Operation argument missing or malformed
    #[error("Invalid argument for {operation}: {reason}")]
    InvalidArgument { operation: String, reason: String },

    /// Block id does not exist in the document
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    /// Block exists but is not of the kind the command needs
    #[error("Block {id} is not a {expected}")]
    WrongBlockKind { id: BlockId, expected: &'static str },

    /// Image failed to load (or has not loaded yet); no geometry is available
    #[error("Image is not ready")]
    ImageNotReady,

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Value could not be converted across the JS boundary
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EditorError {
    pub fn invalid_argument(operation: &str, reason: impl Into<String>) -> Self {
        EditorError::InvalidArgument {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        EditorError::Serialization(err.to_string())
    }
}
