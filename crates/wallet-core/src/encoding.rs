use bech32::{Bech32, Hrp};

use crate::error::WalletError;

/// Serialized extended key length before Base58Check.
pub const XPUB_LEN: usize = 78;

/// Fields of a BIP-32 extended public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpubFields<'a> {
    pub version: u32,
    pub depth: u8,
    pub parent_fingerprint: u32,
    pub child_number: u32,
    pub chain_code: &'a [u8; 32],
    pub public_key: &'a [u8; 33],
}

/// Serializes to the 78-byte BIP-32 layout and Base58Check-encodes it.
pub fn serialize_xpub(fields: &XpubFields<'_>) -> String {
    let mut raw = [0u8; XPUB_LEN];
    raw[0..4].copy_from_slice(&fields.version.to_be_bytes());
    raw[4] = fields.depth;
    raw[5..9].copy_from_slice(&fields.parent_fingerprint.to_be_bytes());
    raw[9..13].copy_from_slice(&fields.child_number.to_be_bytes());
    raw[13..45].copy_from_slice(fields.chain_code);
    raw[45..78].copy_from_slice(fields.public_key);
    bs58::encode(raw).with_check().into_string()
}

/// Bech32-encodes `data` under `hrp`, regrouping 8-bit bytes into padded
/// 5-bit groups.
pub fn bech32_addr_encode(hrp: &str, data: &[u8]) -> Result<String, WalletError> {
    let hrp = Hrp::parse(hrp).map_err(|e| WalletError::EncodingFailed(format!("hrp: {e}")))?;
    bech32::encode::<Bech32>(hrp, data).map_err(|e| WalletError::EncodingFailed(e.to_string()))
}
