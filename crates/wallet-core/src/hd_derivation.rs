use bip32::{ChildNumber, XPrv};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use wallet_utils::hash::fingerprint;
use wallet_utils::PrivateKey;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::coins;
use crate::encoding::{serialize_xpub, XpubFields};
use crate::error::WalletError;
use crate::path_policy::require_xpub_path;
use crate::types::{is_hardened, Curve};
use crate::wire::{AddCoinData, TxnMetadata};

type HmacSha512 = Hmac<Sha512>;

const ED25519_SEED_KEY: &[u8] = b"ed25519 seed";

/// SLIP-0010 ed25519 key state.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
struct Slip10Key {
    key: [u8; 32],
    chain_code: [u8; 32],
}

impl Slip10Key {
    fn from_hmac(chain_key: &[u8], parts: &[&[u8]]) -> Result<Self, WalletError> {
        let mut mac = HmacSha512::new_from_slice(chain_key)
            .map_err(|e| WalletError::DerivationFailed(e.to_string()))?;
        for part in parts {
            mac.update(part);
        }
        let mut output = mac.finalize().into_bytes();

        let mut state = Self {
            key: [0; 32],
            chain_code: [0; 32],
        };
        state.key.copy_from_slice(&output[..32]);
        state.chain_code.copy_from_slice(&output[32..]);
        output.as_mut_slice().zeroize();
        Ok(state)
    }

    /// Hardened child: `HMAC(chain_code, 0x00 || key || index)`.
    fn derive_hardened(&self, index: u32) -> Result<Self, WalletError> {
        Self::from_hmac(&self.chain_code, &[&[0x00][..], &self.key[..], &index.to_be_bytes()[..]])
    }

    fn public_key(&self) -> [u8; 32] {
        ed25519_dalek::SigningKey::from_bytes(&self.key)
            .verifying_key()
            .to_bytes()
    }
}

enum KeyState {
    Secp256k1(XPrv),
    Ed25519(Slip10Key),
}

/// A private HD node on either curve.
///
/// Key material is wiped when the node is dropped. The public key is only
/// available after [`HdNode::fill_public_key`].
pub struct HdNode {
    depth: u8,
    child_number: u32,
    state: KeyState,
    /// Compressed secp256k1 point, or `0x00 || key` for ed25519.
    public_key: Option<[u8; 33]>,
}

impl HdNode {
    pub fn from_seed(seed: &[u8], curve: Curve) -> Result<Self, WalletError> {
        let state = match curve {
            Curve::Secp256k1 => KeyState::Secp256k1(
                XPrv::new(seed).map_err(|e| WalletError::DerivationFailed(e.to_string()))?,
            ),
            Curve::Ed25519 => KeyState::Ed25519(Slip10Key::from_hmac(ED25519_SEED_KEY, &[seed])?),
        };
        Ok(Self {
            depth: 0,
            child_number: 0,
            state,
            public_key: None,
        })
    }

    pub fn curve(&self) -> Curve {
        match self.state {
            KeyState::Secp256k1(_) => Curve::Secp256k1,
            KeyState::Ed25519(_) => Curve::Ed25519,
        }
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    /// Private child derivation. Ed25519 only supports hardened indices.
    pub fn private_ckd(&mut self, index: u32) -> Result<(), WalletError> {
        let depth = self
            .depth
            .checked_add(1)
            .ok_or_else(|| WalletError::DerivationFailed("maximum depth reached".into()))?;

        self.state = match &self.state {
            KeyState::Secp256k1(xprv) => KeyState::Secp256k1(
                xprv.derive_child(ChildNumber(index))
                    .map_err(|e| WalletError::DerivationFailed(e.to_string()))?,
            ),
            KeyState::Ed25519(slip10) => {
                if !is_hardened(index) {
                    return Err(WalletError::DerivationFailed(
                        "ed25519 derivation requires hardened indices".into(),
                    ));
                }
                KeyState::Ed25519(slip10.derive_hardened(index)?)
            }
        };
        self.depth = depth;
        self.child_number = index;
        self.public_key = None;
        Ok(())
    }

    pub fn fill_public_key(&mut self) {
        let public_key = match &self.state {
            KeyState::Secp256k1(xprv) => xprv.public_key().to_bytes(),
            KeyState::Ed25519(slip10) => {
                let mut prefixed = [0u8; 33];
                prefixed[1..].copy_from_slice(&slip10.public_key());
                prefixed
            }
        };
        self.public_key = Some(public_key);
    }

    pub fn public_key(&self) -> Result<&[u8; 33], WalletError> {
        self.public_key
            .as_ref()
            .ok_or_else(|| WalletError::DerivationFailed("public key not filled".into()))
    }

    /// The raw 32-byte ed25519 public key.
    pub fn ed25519_public_key(&self) -> Result<[u8; 32], WalletError> {
        if self.curve() != Curve::Ed25519 {
            return Err(WalletError::DerivationFailed("not an ed25519 node".into()));
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&self.public_key()?[1..]);
        Ok(key)
    }

    /// First four bytes of `hash160(public_key)`.
    pub fn fingerprint(&self) -> Result<u32, WalletError> {
        Ok(fingerprint(self.public_key()?))
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        match &self.state {
            KeyState::Secp256k1(xprv) => &xprv.attrs().chain_code,
            KeyState::Ed25519(slip10) => &slip10.chain_code,
        }
    }

    pub fn private_key(&self) -> PrivateKey {
        match &self.state {
            KeyState::Secp256k1(xprv) => PrivateKey::new(xprv.to_bytes()),
            KeyState::Ed25519(slip10) => PrivateKey::new(slip10.key),
        }
    }
}

/// Master node from `seed`, then one private derivation per path level.
/// The public key is filled once, for the final node.
pub fn derive_hdnode_from_path(
    path: &[u32],
    curve: Curve,
    seed: &[u8],
) -> Result<HdNode, WalletError> {
    let mut node = HdNode::from_seed(seed, curve)?;
    for &index in path {
        node.private_ckd(index)?;
    }
    node.fill_public_key();
    Ok(node)
}

/// Extended public key for `path` under an explicit version.
pub fn xpub_for_path(
    path: &[u32],
    curve: Curve,
    seed: &[u8],
    version: u32,
) -> Result<String, WalletError> {
    let Some((&last, parents)) = path.split_last() else {
        let master = derive_hdnode_from_path(&[], curve, seed)?;
        return serialize_node(&master, 0, version);
    };

    let mut node = derive_hdnode_from_path(parents, curve, seed)?;
    let parent_fingerprint = node.fingerprint()?;
    node.private_ckd(last)?;
    node.fill_public_key();
    serialize_node(&node, parent_fingerprint, version)
}

fn serialize_node(node: &HdNode, parent_fingerprint: u32, version: u32) -> Result<String, WalletError> {
    Ok(serialize_xpub(&XpubFields {
        version,
        depth: node.depth(),
        parent_fingerprint,
        child_number: node.child_number(),
        chain_code: node.chain_code(),
        public_key: node.public_key()?,
    }))
}

/// Extended public key for an account path, with the version bytes of its
/// `(purpose, coin)` pair.
pub fn generate_xpub(path: &[u32], curve: Curve, seed: &[u8]) -> Result<String, WalletError> {
    let [purpose, coin, ..] = *path else {
        return Err(WalletError::InvalidArguments(format!(
            "xpub path of depth {} has no purpose and coin",
            path.len()
        )));
    };
    let version = coins::version_bytes(purpose, coin)?;
    xpub_for_path(path, curve, seed, version.xpub)
}

/// Checks an add-coin request against the xpub policy and exports the
/// account's extended public key on the coin's curve.
pub fn export_coin_xpub(request: &AddCoinData, seed: &[u8]) -> Result<String, WalletError> {
    require_xpub_path(&request.path)?;
    let curve = coins::coin_curve(request.path[1])?;
    generate_xpub(&request.path, curve, seed)
}

/// Which address reference of the metadata to derive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressBranch {
    /// The first change reference.
    Change,
    /// The nth input reference.
    Input(usize),
}

/// Derives the secp256k1 leaf `purpose / coin / account / change / address`
/// for one reference in `metadata`.
pub fn get_address_node(
    metadata: &TxnMetadata,
    branch: AddressBranch,
    seed: &[u8],
) -> Result<HdNode, WalletError> {
    let reference = match branch {
        AddressBranch::Change => metadata.change.first(),
        AddressBranch::Input(n) => metadata.inputs.get(n),
    }
    .ok_or_else(|| WalletError::InvalidArguments(format!("no address reference for {branch:?}")))?;

    derive_hdnode_from_path(&metadata.path_for(reference), Curve::Secp256k1, seed)
}
