//! Error types for byte stream operations.

use std::fmt;

/// Result type for byte stream operations.
pub type ByteResult<T> = Result<T, ByteError>;

/// Errors that can occur while reading big-endian data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteError {
    /// Attempted to read past the end of the buffer.
    UnexpectedEof {
        /// Byte offset at which the read started.
        offset: usize,
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available from `offset`.
        available: usize,
    },
}

impl fmt::Display for ByteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                offset,
                requested,
                available,
            } => write!(
                f,
                "attempted to read {requested} bytes at offset {offset} but only {available} bytes available"
            ),
        }
    }
}

impl std::error::Error for ByteError {}
