use chain_sol::SolanaUnsignedTxn;
use serde::Serialize;

use crate::coins::SOLANA;
use crate::error::WalletError;
use crate::hd_derivation::derive_hdnode_from_path;
use crate::path_policy::require_valid_metadata;
use crate::signer::{sign_with_node, MessageDigest, Signature};
use crate::types::Curve;
use crate::wire::TxnMetadata;

pub const SOL_SYMBOL: &str = "SOL";
pub const SOL_DECIMALS: u8 = 9;

/// Values shown before a Solana transfer is signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolanaTransferSummary {
    pub funding: String,
    pub recipient: String,
    pub lamports: u64,
    pub symbol: &'static str,
    pub decimals: u8,
}

fn require_solana_metadata(metadata: &TxnMetadata) -> Result<[u32; 5], WalletError> {
    require_valid_metadata(metadata)?;
    let coin = metadata.coin.to_unsigned();
    if coin != SOLANA {
        return Err(WalletError::UnsupportedCoin(coin));
    }
    let input = metadata
        .inputs
        .first()
        .ok_or_else(|| WalletError::InvalidArguments("no input reference".into()))?;
    Ok(metadata.path_for(input))
}

/// Decodes a single-transfer message and builds its summary.
pub fn prepare_solana_txn<'a>(
    metadata: &TxnMetadata,
    unsigned: &'a [u8],
) -> Result<(SolanaUnsignedTxn<'a>, SolanaTransferSummary), WalletError> {
    require_solana_metadata(metadata)?;
    let txn = SolanaUnsignedTxn::decode(unsigned)?;

    let summary = SolanaTransferSummary {
        funding: chain_sol::pubkey_to_address(txn.transfer.funding_account),
        recipient: chain_sol::pubkey_to_address(txn.transfer.recipient_account),
        lamports: txn.transfer.lamports,
        symbol: SOL_SYMBOL,
        decimals: SOL_DECIMALS,
    };
    Ok((txn, summary))
}

/// Signs the message bytes with the ed25519 key of the first input.
///
/// The key must be the transfer's funding account.
pub fn sign_solana_txn(
    metadata: &TxnMetadata,
    txn: &SolanaUnsignedTxn<'_>,
    seed: &[u8],
) -> Result<Signature, WalletError> {
    let path = require_solana_metadata(metadata)?;

    let node = derive_hdnode_from_path(&path, Curve::Ed25519, seed)?;
    if node.ed25519_public_key()? != *txn.transfer.funding_account {
        #[cfg(feature = "log")]
        log::warn!("solana funding account is not the signing key");
        return Err(WalletError::InvalidArguments(
            "funding account does not match the signing key".into(),
        ));
    }

    sign_with_node(&node, txn.encoded(), MessageDigest::Sha256d)
}
