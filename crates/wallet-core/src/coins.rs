//! Static coin tables: symbols, names, decimals, curves and the version
//! bytes used for address and extended-key serialization.
//!
//! The Ethereum coin index covers every EVM chain; its lookups go through
//! the chain table in `chain-eth`. Unknown coins, chains and purposes are
//! errors, never a default.

use serde::Serialize;

use crate::error::WalletError;
use crate::types::Curve;

pub const NON_SEGWIT: u32 = 0x8000_002C;
pub const NATIVE_SEGWIT: u32 = 0x8000_0054;

pub const BITCOIN: u32 = 0x8000_0000;
pub const BTC_TEST: u32 = 0x8000_0001;
pub const LITECOIN: u32 = 0x8000_0002;
pub const DOGE: u32 = 0x8000_0003;
pub const DASH: u32 = 0x8000_0005;
pub const ETHEREUM: u32 = 0x8000_003C;
pub const NEAR: u32 = 0x8000_018D;
pub const SOLANA: u32 = 0x8000_01F5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoinDescriptor {
    pub coin_index: u32,
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimals: u8,
    pub curve: Curve,
}

const fn coin(
    coin_index: u32,
    symbol: &'static str,
    name: &'static str,
    decimals: u8,
    curve: Curve,
) -> CoinDescriptor {
    CoinDescriptor {
        coin_index,
        symbol,
        name,
        decimals,
        curve,
    }
}

static COINS: &[CoinDescriptor] = &[
    coin(BITCOIN, "BTC", "Bitcoin", 8, Curve::Secp256k1),
    coin(BTC_TEST, "BTC", "Bitcoin Testnet", 8, Curve::Secp256k1),
    coin(LITECOIN, "LTC", "Litecoin", 8, Curve::Secp256k1),
    coin(DOGE, "DOGE", "Dogecoin", 8, Curve::Secp256k1),
    coin(DASH, "DASH", "Dash", 8, Curve::Secp256k1),
    coin(ETHEREUM, "ETH", "Ethereum", 18, Curve::Secp256k1),
    coin(NEAR, "NEAR", "NEAR", 24, Curve::Ed25519),
    coin(SOLANA, "SOL", "Solana", 9, Curve::Ed25519),
];

/// Address version byte and extended public key version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionBytes {
    pub address: u8,
    pub xpub: u32,
}

const fn version(address: u8, xpub: u32) -> VersionBytes {
    VersionBytes { address, xpub }
}

static VERSIONS: &[(u32, u32, VersionBytes)] = &[
    (NATIVE_SEGWIT, BITCOIN, version(0x00, 0x04b2_4746)),
    (NATIVE_SEGWIT, BTC_TEST, version(0x6f, 0x045f_1cf6)),
    // reachable only if the path policy admits segwit for these coins
    (NATIVE_SEGWIT, LITECOIN, version(0x30, 0x0488_b21e)),
    (NATIVE_SEGWIT, DOGE, version(0x1e, 0x02fa_cafd)),
    (NATIVE_SEGWIT, DASH, version(0x4c, 0x0488_b21e)),
    (NON_SEGWIT, BITCOIN, version(0x00, 0x0488_b21e)),
    (NON_SEGWIT, BTC_TEST, version(0x6f, 0x0435_87cf)),
    (NON_SEGWIT, LITECOIN, version(0x30, 0x0488_b21e)),
    (NON_SEGWIT, DOGE, version(0x1e, 0x02fa_cafd)),
    (NON_SEGWIT, DASH, version(0x4c, 0x0488_b21e)),
    (NON_SEGWIT, ETHEREUM, version(0x00, 0x0488_b21e)),
    (NON_SEGWIT, NEAR, version(0x00, 0x0488_b21e)),
    (NON_SEGWIT, SOLANA, version(0x00, 0x0488_b21e)),
];

pub fn coin_descriptor(coin_index: u32) -> Result<&'static CoinDescriptor, WalletError> {
    COINS
        .iter()
        .find(|c| c.coin_index == coin_index)
        .ok_or(WalletError::UnsupportedCoin(coin_index))
}

fn evm_chain(chain_id: u64) -> Result<&'static chain_eth::EvmChain, WalletError> {
    chain_eth::get_chain(chain_id).ok_or(WalletError::UnsupportedChain(chain_id))
}

pub fn coin_symbol(coin_index: u32, chain_id: u64) -> Result<&'static str, WalletError> {
    match coin_index {
        ETHEREUM => Ok(evm_chain(chain_id)?.symbol),
        _ => Ok(coin_descriptor(coin_index)?.symbol),
    }
}

pub fn coin_name(coin_index: u32, chain_id: u64) -> Result<&'static str, WalletError> {
    match coin_index {
        ETHEREUM => Ok(evm_chain(chain_id)?.name),
        _ => Ok(coin_descriptor(coin_index)?.name),
    }
}

pub fn coin_decimals(coin_index: u32, chain_id: u64) -> Result<u8, WalletError> {
    match coin_index {
        ETHEREUM => Ok(evm_chain(chain_id)?.decimals),
        _ => Ok(coin_descriptor(coin_index)?.decimals),
    }
}

pub fn coin_curve(coin_index: u32) -> Result<Curve, WalletError> {
    Ok(coin_descriptor(coin_index)?.curve)
}

/// Bitcoin, its testnet, and the Bitcoin-derived UTXO coins.
pub fn is_btc_family(coin_index: u32) -> bool {
    matches!(coin_index, BITCOIN | BTC_TEST | LITECOIN | DOGE | DASH)
}

pub fn version_bytes(purpose: u32, coin_index: u32) -> Result<VersionBytes, WalletError> {
    VERSIONS
        .iter()
        .find(|(p, c, _)| *p == purpose && *c == coin_index)
        .map(|(_, _, v)| *v)
        .ok_or_else(|| {
            WalletError::InvalidArguments(format!(
                "no version bytes for purpose {purpose:#010x} coin {coin_index:#010x}"
            ))
        })
}
