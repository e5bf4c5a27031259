use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;
use sha3::{Digest, Keccak256};

use crate::error::EthError;

/// Derives the 20-byte account address of a compressed secp256k1 public key.
///
/// The key is decompressed, and the address is the last 20 bytes of the
/// Keccak-256 hash of the 64-byte uncompressed point (without the 0x04
/// prefix).
pub fn pubkey_to_address(pubkey_33_bytes: &[u8; 33]) -> Result<[u8; 20], EthError> {
    let pubkey = PublicKey::from_sec1_bytes(pubkey_33_bytes).map_err(|e| {
        EthError::InvalidPublicKey(format!("invalid compressed key encoding: {e}"))
    })?;

    let uncompressed = pubkey.to_encoded_point(false);
    let hash = Keccak256::digest(&uncompressed.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Ok(address)
}

/// Formats an address with the EIP-55 mixed-case checksum.
pub fn checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let hash = Keccak256::digest(lower.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }
    checksummed
}

/// Convenience: compressed public key straight to its EIP-55 string.
pub fn pubkey_to_checksum_address(pubkey_33_bytes: &[u8; 33]) -> Result<String, EthError> {
    pubkey_to_address(pubkey_33_bytes).map(|address| checksum_address(&address))
}
