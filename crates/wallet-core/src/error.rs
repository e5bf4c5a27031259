use serde::Serialize;
use thiserror::Error;

use chain_btc::BtcError;
use chain_eth::EthError;
use chain_sol::SolError;
use wallet_utils::ReadError;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("decoding failed: {0}")]
    Decoding(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("derivation path rejected: {0}")]
    PolicyViolation(String),

    #[error("unsupported coin: {0:#010x}")]
    UnsupportedCoin(u32),

    #[error("unsupported chain: {0}")]
    UnsupportedChain(u64),

    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),
}

/// Outcome reported to the task dispatcher. Values match the device's
/// manager task status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum ErrorCode {
    Success = 0,
    Failed = 1,
    Rejected = 2,
    InvalidArgs = 3,
    DecodingFailed = 4,
    EncodingFailed = 5,
    P0Abort = 6,
    P0Timeout = 7,
    UnknownQueryRequest = 8,
    InvalidState = 9,
    InvalidDefault = 0xFF,
}

impl ErrorCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl WalletError {
    /// Generic outcome shown to the user; the variant detail stays in logs.
    pub fn code(&self) -> ErrorCode {
        match self {
            WalletError::Decoding(_)
            | WalletError::UnsupportedCoin(_)
            | WalletError::UnsupportedChain(_) => ErrorCode::DecodingFailed,
            WalletError::InvalidArguments(_)
            | WalletError::PolicyViolation(_)
            | WalletError::InvalidMnemonic(_) => ErrorCode::InvalidArgs,
            WalletError::EncodingFailed(_) => ErrorCode::EncodingFailed,
            WalletError::DerivationFailed(_) | WalletError::SigningFailed(_) => ErrorCode::Failed,
        }
    }
}

impl From<ReadError> for WalletError {
    fn from(e: ReadError) -> Self {
        WalletError::Decoding(e.to_string())
    }
}

impl From<BtcError> for WalletError {
    fn from(e: BtcError) -> Self {
        WalletError::EncodingFailed(format!("btc: {e}"))
    }
}

impl From<EthError> for WalletError {
    fn from(e: EthError) -> Self {
        match e {
            EthError::InvalidPublicKey(_) => WalletError::EncodingFailed(format!("eth: {e}")),
            EthError::UnsupportedChain(chain_id) => WalletError::UnsupportedChain(chain_id),
            EthError::ChainIdMismatch { .. } => WalletError::InvalidArguments(format!("eth: {e}")),
            EthError::DecodingError(_)
            | EthError::FieldTooLong { .. }
            | EthError::InvalidTransaction(_) => WalletError::Decoding(format!("eth: {e}")),
        }
    }
}

impl From<SolError> for WalletError {
    fn from(e: SolError) -> Self {
        WalletError::Decoding(format!("sol: {e}"))
    }
}
