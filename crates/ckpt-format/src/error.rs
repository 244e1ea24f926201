//! Error types for checkpoint decoding.

use ckpt_model::WorkKind;
use thiserror::Error;

/// Errors that can occur when decoding a checkpoint file.
///
/// A decode failure is final for the file it happened on; callers report it
/// and move on to the next file.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Unrecognized magic number; not a checkpoint file.
    #[error("unknown checkpoint format (magic {magic:#010x})")]
    UnknownFormat { magic: u32 },

    /// Recognized kind with a stale or future format version.
    #[error("unsupported {kind} checkpoint version {found} (expected {expected})")]
    UnsupportedVersion {
        kind: WorkKind,
        expected: u32,
        found: u32,
    },

    /// The file ended before a required field.
    #[error("checkpoint truncated while reading {field}")]
    Truncated { field: &'static str },

    /// The header validator rejected the content.
    #[error("invalid checkpoint: {message}")]
    Invalid { message: String },

    /// I/O error other than end of file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for checkpoint decoding.
pub type Result<T> = std::result::Result<T, DecodeError>;

impl DecodeError {
    /// Create an Invalid error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a Truncated error.
    pub fn truncated(field: &'static str) -> Self {
        Self::Truncated { field }
    }

    /// Map a read failure on `field`, treating end of file as truncation.
    pub(crate) fn from_read(error: std::io::Error, field: &'static str) -> Self {
        if error.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::truncated(field)
        } else {
            Self::Io(error)
        }
    }
}
