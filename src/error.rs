//! Error types shared by every layer of the crate.

use crate::compression::Code;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while compressing or decompressing.
///
/// A full dictionary is deliberately absent from this list: it is an expected
/// steady state reported through [`crate::compression::Insert::Full`] and the
/// session statistics, never a failure.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input handed to a boundary layer
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A configuration value outside the supported range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A code that was never assigned and is not the next code to be assigned.
    ///
    /// `offset` is the position of the offending code: its index for
    /// code-level decoding, or the byte offset of its first bit in a packed
    /// stream. The dictionary alone does not know the position and leaves it
    /// empty; the decoder fills it in.
    #[error("unknown code {code}{}", offset_suffix(.offset))]
    UnknownCode { code: Code, offset: Option<usize> },

    /// The decoder already failed on this session and refuses further codes
    #[error("decoder session aborted after an earlier error")]
    SessionAborted,

    /// A packed stream ended before its end marker
    #[error("code stream truncated at byte {byte_offset}")]
    TruncatedStream { byte_offset: usize },

    /// The container header is missing or malformed
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Decompressed length differs from the length recorded in the header
    #[error("length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    /// CRC-32 of the decompressed data differs from the recorded checksum
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn offset_suffix(offset: &Option<usize>) -> String {
    match offset {
        Some(offset) => format!(" at offset {}", offset),
        None => String::new(),
    }
}

impl Error {
    /// Attaches a stream position to an [`Error::UnknownCode`]; other variants
    /// pass through untouched.
    pub(crate) fn at_offset(self, offset: usize) -> Self {
        match self {
            Error::UnknownCode { code, .. } => Error::UnknownCode {
                code,
                offset: Some(offset),
            },
            other => other,
        }
    }
}
