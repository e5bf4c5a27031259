//! Derivation-path policy.
//!
//! Two independent gates: the raw-path predicates guard extended-key export
//! and receive-address requests, and [`validate_txn_metadata`] guards
//! signing requests. Each call site runs its own gate.

use crate::coins::{
    self, BITCOIN, BTC_TEST, ETHEREUM, NATIVE_SEGWIT, NEAR, NON_SEGWIT, SOLANA,
};
use crate::error::WalletError;
use crate::types::{is_hardened, AddressRef, HARDENED};
use crate::wire::TxnMetadata;

/// `purpose / coin / account`
pub const XPUB_DEPTH: usize = 3;
/// `purpose / coin / account / change / address`
pub const ADDRESS_DEPTH: usize = 5;

/// Native segwit is only defined for Bitcoin and its testnet.
fn purpose_allowed(purpose: u32, coin: u32) -> bool {
    purpose == NON_SEGWIT || (purpose == NATIVE_SEGWIT && matches!(coin, BITCOIN | BTC_TEST))
}

/// m/44'/397'/0'/0'/i'
fn near_path_valid(path: &[u32]) -> bool {
    path.len() == ADDRESS_DEPTH
        && path[0] == NON_SEGWIT
        && path[2] == HARDENED
        && path[3] == HARDENED
        && is_hardened(path[4])
}

/// m/44'/501'[/i'[/j'[/k']]], every level hardened.
fn sol_path_valid(path: &[u32]) -> bool {
    (2..=ADDRESS_DEPTH).contains(&path.len())
        && path[0] == NON_SEGWIT
        && path.iter().all(|&index| is_hardened(index))
}

pub fn verify_xpub_derivation_path(path: &[u32]) -> bool {
    if path.len() < 2 {
        return false;
    }
    let (purpose, coin) = (path[0], path[1]);

    match coin {
        NEAR => near_path_valid(path),
        SOLANA => sol_path_valid(path),
        ETHEREUM => purpose == NON_SEGWIT && path.len() == XPUB_DEPTH && is_hardened(path[2]),
        c if coins::is_btc_family(c) => {
            purpose_allowed(purpose, coin) && path.len() == XPUB_DEPTH && is_hardened(path[2])
        }
        _ => false,
    }
}

pub fn verify_receive_derivation_path(path: &[u32]) -> bool {
    if path.len() < 2 {
        return false;
    }
    let (purpose, coin) = (path[0], path[1]);

    match coin {
        NEAR => near_path_valid(path),
        SOLANA => sol_path_valid(path),
        ETHEREUM => {
            path.len() == ADDRESS_DEPTH
                && purpose == NON_SEGWIT
                && is_hardened(path[2])
                && path[3] == 0
                && path[4] == 0
        }
        c if coins::is_btc_family(c) => {
            path.len() == ADDRESS_DEPTH
                && purpose_allowed(purpose, coin)
                && is_hardened(path[2])
                && path[3] == 0
                && !is_hardened(path[4])
        }
        _ => false,
    }
}

fn unhardened_ref(reference: &AddressRef) -> bool {
    !reference.change.is_hardened() && !reference.address.is_hardened()
}

fn hardened_ref(reference: &AddressRef) -> bool {
    reference.change.is_hardened() && reference.address.is_hardened()
}

/// Checks the derivation fields of decoded transaction metadata.
///
/// Every input, the output and every change reference are checked.
pub fn validate_txn_metadata(metadata: &TxnMetadata) -> bool {
    if !(metadata.purpose.is_hardened()
        && metadata.coin.is_hardened()
        && metadata.account.is_hardened())
    {
        return false;
    }
    let purpose = metadata.purpose.to_unsigned();
    let coin = metadata.coin.to_unsigned();

    match coin {
        NEAR | SOLANA => purpose == NON_SEGWIT && metadata.inputs.iter().all(hardened_ref),
        ETHEREUM | BITCOIN | BTC_TEST | coins::LITECOIN | coins::DOGE | coins::DASH => {
            let purpose_ok = if coin == ETHEREUM {
                purpose == NON_SEGWIT
            } else {
                purpose_allowed(purpose, coin)
            };
            let refs_ok = metadata
                .inputs
                .iter()
                .chain(std::iter::once(&metadata.output))
                .chain(metadata.change.iter())
                .all(unhardened_ref);
            let token_ok = !(coin == ETHEREUM && metadata.token_name.is_empty());
            purpose_ok && refs_ok && token_ok
        }
        _ => false,
    }
}

fn rejected(path: &[u32]) -> WalletError {
    #[cfg(feature = "log")]
    log::warn!(
        "derivation path rejected: depth {} coin {:#010x}",
        path.len(),
        path.get(1).copied().unwrap_or_default()
    );
    WalletError::PolicyViolation(format!("depth {}", path.len()))
}

pub fn require_xpub_path(path: &[u32]) -> Result<(), WalletError> {
    if verify_xpub_derivation_path(path) {
        Ok(())
    } else {
        Err(rejected(path))
    }
}

pub fn require_receive_path(path: &[u32]) -> Result<(), WalletError> {
    if verify_receive_derivation_path(path) {
        Ok(())
    } else {
        Err(rejected(path))
    }
}

pub fn require_valid_metadata(metadata: &TxnMetadata) -> Result<(), WalletError> {
    if validate_txn_metadata(metadata) {
        Ok(())
    } else {
        #[cfg(feature = "log")]
        log::warn!(
            "transaction metadata rejected for coin {:#010x}",
            metadata.coin.to_unsigned()
        );
        Err(WalletError::PolicyViolation("transaction metadata".into()))
    }
}

/// Formats `path` as `m/44'/60'/0'/0/0`. With `harden_all` every level is
/// marked hardened regardless of its top bit.
pub fn path_to_string(path: &[u32], harden_all: bool) -> String {
    let mut out = String::from("m");
    for &index in path {
        out.push_str(&format!("/{}", index & !HARDENED));
        if harden_all || is_hardened(index) {
            out.push('\'');
        }
    }
    out
}

/// Parses `m/44'/60'/0'/0/0`; `'` or `h` marks a hardened level.
pub fn parse_path(path: &str) -> Result<Vec<u32>, WalletError> {
    let invalid = |detail: String| WalletError::InvalidArguments(format!("path {path:?}: {detail}"));

    let mut levels = path.split('/');
    if levels.next() != Some("m") {
        return Err(invalid("must start with m".into()));
    }

    levels
        .map(|level| {
            let (digits, hardened) = match level.strip_suffix(['\'', 'h']) {
                Some(digits) => (digits, true),
                None => (level, false),
            };
            let value: u32 = digits
                .parse()
                .map_err(|e| invalid(format!("level {level:?}: {e}")))?;
            if is_hardened(value) {
                return Err(invalid(format!("level {level:?} out of range")));
            }
            Ok(if hardened { value | HARDENED } else { value })
        })
        .collect()
}
