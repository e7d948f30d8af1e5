//! Snapshot decoding errors.

use thiserror::Error;

/// Failure kinds that abort a whole extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bootstrap text missing, or present but not decodable.
    Parse,
    /// Decoded object lacks the chunk-list shape.
    Structure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parse => "parse_error",
            Self::Structure => "structure_error",
        }
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Bootstrap script not found")]
    ScriptNotFound,

    #[error("Snapshot assignment not found in bootstrap script")]
    AssignmentNotFound,

    #[error("Invalid snapshot JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid snapshot structure: {0}")]
    InvalidStructure(String),
}

impl SnapshotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ScriptNotFound | Self::AssignmentNotFound | Self::InvalidJson(_) => {
                ErrorKind::Parse
            }
            Self::InvalidStructure(_) => ErrorKind::Structure,
        }
    }
}

/// Per-chunk failure. Never escapes the decoder: the chunk is skipped.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("chunk entry has no payload")]
    MissingPayload,

    #[error("chunk payload is not valid JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("chunk payload is not an array")]
    NotAnArray,
}
