use thiserror::Error;
use wallet_utils::ReadError;

/// Solana transaction decoding errors.
#[derive(Debug, Error)]
pub enum SolError {
    #[error("decoding error: {0}")]
    Read(#[from] ReadError),

    #[error("account index {index} out of range for {count} accounts")]
    InvalidAccountIndex { index: u8, count: usize },

    #[error("unsupported transaction: {0}")]
    UnsupportedTransaction(String),
}
