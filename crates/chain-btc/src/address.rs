use bitcoin::address::Address;
use bitcoin::{CompressedPublicKey, Network};
use wallet_utils::hash::hash160;

use crate::error::BtcError;

fn parse_pubkey(pubkey_bytes: &[u8; 33]) -> Result<CompressedPublicKey, BtcError> {
    CompressedPublicKey::from_slice(pubkey_bytes).map_err(|e| {
        BtcError::InvalidPublicKey(format!("failed to parse compressed public key: {e}"))
    })
}

/// Derive a P2WPKH (native SegWit bech32) address from a compressed public key.
///
/// `bc1...` on mainnet, `tb1...` on testnet.
pub fn pubkey_to_p2wpkh_address(
    pubkey_bytes: &[u8; 33],
    network: Network,
) -> Result<String, BtcError> {
    let compressed_pk = parse_pubkey(pubkey_bytes)?;
    Ok(Address::p2wpkh(&compressed_pk, network).to_string())
}

/// Derive a legacy P2PKH address: Base58Check of `version || hash160(pubkey)`.
///
/// The version byte selects the coin (0x00 Bitcoin, 0x6f testnet, 0x30
/// Litecoin, 0x1e Dogecoin, 0x4c Dash).
pub fn pubkey_to_p2pkh_address(pubkey_bytes: &[u8; 33], version: u8) -> Result<String, BtcError> {
    // Reject points that are not on the curve before hashing.
    parse_pubkey(pubkey_bytes)?;

    let mut payload = [0u8; 21];
    payload[0] = version;
    payload[1..].copy_from_slice(&hash160(pubkey_bytes));
    Ok(bs58::encode(payload).with_check().into_string())
}
