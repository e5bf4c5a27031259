use thiserror::Error;

/// Errors raised while pulling fields out of an untrusted buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("read of {len} bytes at offset {offset} exceeds declared size {size}")]
    OutOfBounds { offset: usize, len: usize, size: usize },

    #[error("reader is poisoned")]
    Poisoned,

    #[error("missing nul terminator")]
    MissingTerminator,

    #[error("malformed compact length")]
    MalformedCompactLength,

    #[error("declared size {declared} exceeds buffer length {actual}")]
    DeclaredSizeTooLarge { declared: usize, actual: usize },

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
