use std::fmt;
use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::ReadError;

/// Smallest and largest seed lengths accepted for master key generation.
pub const MIN_SEED_LEN: usize = 16;
pub const MAX_SEED_LEN: usize = 64;

/// A wallet seed, zeroed when dropped.
///
/// BIP-39 seeds are 64 bytes; shorter seeds (down to 16 bytes) are accepted
/// so that BIP-32 test vectors can be fed through the same derivation code.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Seed(Vec<u8>);

impl Seed {
    pub fn new(bytes: Vec<u8>) -> Result<Self, ReadError> {
        let seed = Self(bytes);
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.0.len()) {
            return Err(ReadError::InvalidLength {
                expected: MAX_SEED_LEN,
                actual: seed.0.len(),
            });
        }
        Ok(seed)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ReadError> {
        Self::new(bytes.to_vec())
    }
}

impl From<[u8; 64]> for Seed {
    fn from(mut bytes: [u8; 64]) -> Self {
        let seed = Self(bytes.to_vec());
        bytes.zeroize();
        seed
    }
}

impl Deref for Seed {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed([REDACTED; {}])", self.0.len())
    }
}

/// A 32-byte private scalar, zeroed when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_accepts_bip32_and_bip39_lengths() {
        assert_eq!(Seed::from_slice(&[1u8; 16]).unwrap().len(), 16);
        assert_eq!(Seed::from_slice(&[1u8; 64]).unwrap().len(), 64);
    }

    #[test]
    fn seed_rejects_out_of_range_lengths() {
        assert!(Seed::from_slice(&[1u8; 15]).is_err());
        assert!(Seed::from_slice(&[1u8; 65]).is_err());
    }

    #[test]
    fn seed_from_array() {
        let seed = Seed::from([0xabu8; 64]);
        assert_eq!(&seed[..2], &[0xab, 0xab]);
    }

    #[test]
    fn seed_zeroize_clears_contents() {
        let mut seed = Seed::from_slice(&[0x42; 32]).unwrap();
        seed.zeroize();
        assert!(seed.is_empty());
    }

    #[test]
    fn debug_output_is_redacted() {
        let seed = Seed::from_slice(&[0x42; 32]).unwrap();
        let key = PrivateKey::new([0x42; 32]);
        assert_eq!(format!("{seed:?}"), "Seed([REDACTED; 32])");
        assert_eq!(format!("{key:?}"), "PrivateKey([REDACTED])");
    }

    #[test]
    fn private_key_zeroize_clears_contents() {
        let mut key = PrivateKey::new([0x42; 32]);
        key.zeroize();
        assert_eq!(key.as_bytes(), &[0u8; 32]);
    }
}
