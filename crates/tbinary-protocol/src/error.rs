use tbinary_transport::TransportError;

use crate::types::TType;

/// Errors that can occur while encoding or decoding protocol values.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A numeric value does not fit the target width (or the exact-integer range).
    #[error("value {value} out of range for {width}-byte integer")]
    OutOfRange { width: usize, value: i64 },

    /// A fixed-width unpack received the wrong number of bytes.
    #[error("size mismatch (expected {expected} bytes, got {actual})")]
    SizeMismatch { expected: usize, actual: usize },

    /// A versioned message header carried an unknown version.
    #[error("missing version identifier in message header ({0:#010x})")]
    MissingVersionIdentifier(i32),

    /// An unversioned message header arrived while strict reads are enforced.
    #[error("invalid version identifier: unversioned header ({0}) rejected by strict read")]
    InvalidVersionIdentifier(i32),

    /// A type tag byte does not name a known wire type.
    #[error("invalid type tag {0}")]
    InvalidTypeTag(u8),

    /// A message kind byte does not name a known message type.
    #[error("invalid message type {0}")]
    InvalidMessageType(u8),

    /// A length prefix was negative.
    #[error("negative size {0}")]
    NegativeSize(i32),

    /// A length or count exceeded the configured limit.
    #[error("size {size} exceeds limit {max}")]
    SizeLimit { size: usize, max: usize },

    /// Nested values went deeper than the configured limit.
    #[error("nesting depth exceeds limit {0}")]
    DepthLimitExceeded(usize),

    /// A collection element did not match the declared element type.
    #[error("type mismatch (declared {expected}, found {actual})")]
    TypeMismatch { expected: TType, actual: TType },

    /// A string payload was not valid UTF-8.
    #[error("invalid UTF-8 in string payload: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// The byte channel failed; passed through unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
