//! Solana support for the wallet core.
//!
//! Decodes the compact binary message format of an unsigned legacy Solana
//! transaction, restricted to a single System Program `Transfer`. Anything
//! the device cannot fully summarize is a decode failure. Account keys,
//! blockhash and instruction data are borrowed from the input buffer.

pub mod address;
pub mod error;
pub mod transaction;

pub use address::pubkey_to_address;
pub use error::SolError;
pub use transaction::{
    MessageHeader, SolanaInstruction, SolanaUnsignedTxn, SystemTransfer, SYSTEM_PROGRAM_ID,
};
