use serde::Serialize;
use zeroize::Zeroize;

/// Bit 31 of a derivation index marks hardened derivation.
pub const HARDENED: u32 = 0x8000_0000;

/// One derivation index as carried on the wire: 4 bytes, big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Zeroize)]
pub struct PathIndex([u8; 4]);

impl PathIndex {
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub const fn from_u32(index: u32) -> Self {
        Self(index.to_be_bytes())
    }

    pub const fn hardened(index: u32) -> Self {
        Self::from_u32(index | HARDENED)
    }

    pub fn is_hardened(&self) -> bool {
        self.0[0] & 0x80 != 0
    }

    pub fn to_unsigned(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<u32> for PathIndex {
    fn from(index: u32) -> Self {
        Self::from_u32(index)
    }
}

/// The `change / address_index` tail of a BIP-44 path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Zeroize)]
pub struct AddressRef {
    pub change: PathIndex,
    pub address: PathIndex,
}

impl AddressRef {
    pub fn new(change: impl Into<PathIndex>, address: impl Into<PathIndex>) -> Self {
        Self {
            change: change.into(),
            address: address.into(),
        }
    }
}

/// Signature curve a coin derives its keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Curve {
    Secp256k1,
    Ed25519,
}

pub fn is_hardened(index: u32) -> bool {
    index & HARDENED != 0
}
