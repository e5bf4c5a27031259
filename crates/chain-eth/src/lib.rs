//! EVM-family support for the wallet core.
//!
//! This crate provides:
//! - The table of EVM networks the device signs for
//! - Legacy EIP-155 unsigned-transaction decoding, validation and payload
//!   classification (clear signing vs. blind signing)
//! - The ERC-20 contract whitelist consulted by the classifier
//! - Account addresses from secp256k1 public keys (with EIP-55 checksums)

pub mod address;
pub mod chains;
pub mod erc20;
pub mod error;
pub mod transaction;

pub use address::{checksum_address, pubkey_to_address, pubkey_to_checksum_address};
pub use chains::{get_chain, EvmChain};
pub use erc20::{ContractRegistry, Erc20Contract, Erc20Whitelist};
pub use error::EthError;
pub use transaction::{
    EvmTxnSummary, EvmUnsignedTxn, PayloadStatus, SizedBytes, ValidatedEvmTxn,
};
