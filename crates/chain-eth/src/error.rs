use thiserror::Error;

/// EVM decoding and validation errors.
#[derive(Debug, Error)]
pub enum EthError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("decoding error: {0}")]
    DecodingError(String),

    #[error("field too long: {field} is {len} bytes, limit {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("unsupported chain: {0}")]
    UnsupportedChain(u64),

    #[error("chain id mismatch: expected {expected}, got {actual}")]
    ChainIdMismatch { expected: u64, actual: u64 },

    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
}
