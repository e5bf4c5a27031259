//! Solana addresses are the Base58 encoding of the raw 32-byte Ed25519
//! public key. No hashing is applied.

/// Convert a 32-byte Ed25519 public key to a Solana address string.
pub fn pubkey_to_address(ed25519_pubkey: &[u8; 32]) -> String {
    bs58::encode(ed25519_pubkey).into_string()
}
