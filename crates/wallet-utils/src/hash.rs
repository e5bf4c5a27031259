//! Hash compositions used for fingerprints, addresses and signing digests.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use sha3::Keccak256;

/// `RIPEMD160(SHA256(data))`, the payload of P2PKH/P2WPKH addresses and
/// the source of BIP-32 key fingerprints.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(data)).into()
}

/// `SHA256(SHA256(data))`.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(data)).into()
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// First four bytes of [`hash160`] as a big-endian integer.
pub fn fingerprint(public_key: &[u8]) -> u32 {
    let digest = hash160(public_key);
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn hash160_of_generator_point() {
        let pubkey = hex!("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
        assert_eq!(
            hash160(&pubkey),
            hex!("751e76e8199196d454941c45d1b3a323f1433bd6")
        );
    }

    #[test]
    fn sha256d_of_empty_input() {
        assert_eq!(
            sha256d(b""),
            hex!("5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456")
        );
    }

    #[test]
    fn keccak256_of_empty_input() {
        assert_eq!(
            keccak256(b""),
            hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
        );
    }

    #[test]
    fn fingerprint_is_hash160_prefix() {
        let pubkey = hex!("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
        assert_eq!(fingerprint(&pubkey), 0x751e_76e8);
    }
}
