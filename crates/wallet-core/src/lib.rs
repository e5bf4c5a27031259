//! Transaction interpretation and key derivation for the wallet device.
//!
//! Untrusted request buffers are decoded by [`wire`], checked by
//! [`path_policy`], and only then turned into keys by [`hd_derivation`] and
//! signatures by [`signer`]. The per-chain flows in [`evm`], [`solana`] and
//! [`address`] compose those steps; nothing here performs I/O.

pub mod address;
pub mod coins;
pub mod encoding;
pub mod error;
pub mod evm;
pub mod hd_derivation;
pub mod mnemonic;
pub mod path_policy;
pub mod signer;
pub mod solana;
pub mod types;
pub mod wire;

pub use address::{derive_receive_address, ReceiveAddress};
pub use error::{ErrorCode, WalletError};
pub use evm::{prepare_evm_txn, sign_evm_txn};
pub use hd_derivation::{
    derive_hdnode_from_path, export_coin_xpub, generate_xpub, get_address_node, AddressBranch,
    HdNode,
};
pub use mnemonic::SigningContext;
pub use signer::{sign, sign_with_node, MessageDigest, Signature};
pub use solana::{prepare_solana_txn, sign_solana_txn, SolanaTransferSummary};
pub use types::{AddressRef, Curve, PathIndex};
pub use wire::{AddCoinData, ReceiveAddressData, TxnMetadata};

pub use chain_eth::{ContractRegistry, Erc20Whitelist, EvmTxnSummary, PayloadStatus};

/// Maps a flow result to the outcome reported back to the host.
pub fn outcome<T>(result: &Result<T, WalletError>) -> ErrorCode {
    match result {
        Ok(_) => ErrorCode::Success,
        Err(err) => err.code(),
    }
}
