//! Core error types for the diff library
//!
//! Additions, removals and changes are normal outcomes of a comparison and are
//! never reported through these types. Errors only cover inputs that could not
//! be loaded and models that break their own uniqueness invariants.

use std::fmt;

/// Result type for diff operations
pub type Result<T> = std::result::Result<T, DiffError>;

/// Errors that can occur while loading or comparing snapshots
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("Failed to load network definition: {0}")]
    LoadError(String),

    #[error("Duplicate key in model: {0}")]
    DuplicateKey(DuplicateKey),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DiffError {
    /// True if this error is a structural invariant violation of an input model
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, DiffError::DuplicateKey(_))
    }
}

/// The key that collided while indexing a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateKey {
    /// Two messages share the same frame ID
    FrameId(u32),
    /// Two signals of one message share the same name
    Signal { frame_id: u32, signal: String },
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateKey::FrameId(id) => write!(f, "frame ID 0x{:X} ({})", id, id),
            DuplicateKey::Signal { frame_id, signal } => {
                write!(f, "signal '{}' in frame ID 0x{:X}", signal, frame_id)
            }
        }
    }
}
