use ed25519_dalek::Signer as _;
use k256::ecdsa::SigningKey;
use wallet_utils::hash::{keccak256, sha256d};

use crate::error::WalletError;
use crate::hd_derivation::{derive_hdnode_from_path, HdNode};
use crate::types::Curve;

/// Digest applied to the message before secp256k1 signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDigest {
    Keccak256,
    Sha256d,
}

impl MessageDigest {
    pub fn digest(self, message: &[u8]) -> [u8; 32] {
        match self {
            MessageDigest::Keccak256 => keccak256(message),
            MessageDigest::Sha256d => sha256d(message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    /// Low-S `r || s` plus the public key recovery id.
    Ecdsa { rs: [u8; 64], recovery_id: u8 },
    Ed25519([u8; 64]),
}

impl Signature {
    /// `r || s || v` for ECDSA, the raw 64 bytes for ed25519.
    pub fn to_vec(&self) -> Vec<u8> {
        match self {
            Signature::Ecdsa { rs, recovery_id } => {
                let mut out = Vec::with_capacity(65);
                out.extend_from_slice(rs);
                out.push(*recovery_id);
                out
            }
            Signature::Ed25519(sig) => sig.to_vec(),
        }
    }
}

/// Derives the key at `path` and signs `message`.
///
/// The path must already have passed the derivation policy.
pub fn sign(
    path: &[u32],
    curve: Curve,
    seed: &[u8],
    message: &[u8],
    digest: MessageDigest,
) -> Result<Signature, WalletError> {
    let node = derive_hdnode_from_path(path, curve, seed)?;
    sign_with_node(&node, message, digest)
}

/// Signs `message` with the private key of an already derived node.
///
/// secp256k1 signs `digest(message)` with RFC 6979 nonces; ed25519 signs the
/// message itself and ignores `digest`.
pub fn sign_with_node(
    node: &HdNode,
    message: &[u8],
    digest: MessageDigest,
) -> Result<Signature, WalletError> {
    let private_key = node.private_key();

    match node.curve() {
        Curve::Secp256k1 => {
            let signing_key = SigningKey::from_slice(private_key.as_bytes())
                .map_err(|e| WalletError::SigningFailed(e.to_string()))?;
            let prehash = digest.digest(message);
            let (signature, recovery_id) = signing_key
                .sign_prehash_recoverable(&prehash)
                .map_err(|e| WalletError::SigningFailed(e.to_string()))?;
            let mut rs = [0u8; 64];
            rs.copy_from_slice(&signature.to_bytes());
            Ok(Signature::Ecdsa {
                rs,
                recovery_id: recovery_id.to_byte(),
            })
        }
        Curve::Ed25519 => {
            let signing_key = ed25519_dalek::SigningKey::from_bytes(private_key.as_bytes());
            Ok(Signature::Ed25519(signing_key.sign(message).to_bytes()))
        }
    }
}
