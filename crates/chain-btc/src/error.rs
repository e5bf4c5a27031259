use thiserror::Error;

/// Bitcoin-family address encoding errors.
#[derive(Debug, Error)]
pub enum BtcError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}
