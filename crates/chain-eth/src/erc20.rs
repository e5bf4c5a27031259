//! ERC-20 transfer recognition and the contract whitelist.
//!
//! The device only clear-signs calldata it can fully explain. For EVM
//! payloads that means `transfer(address,uint256)` sent to a contract the
//! registry knows for the transaction's chain.

use hex_literal::hex;
use serde::Serialize;

/// Function selector for `transfer(address,uint256)`: `0xa9059cbb`.
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Selector plus two ABI words.
pub const TRANSFER_CALLDATA_LEN: usize = 4 + 32 + 32;

/// A token contract the device can clear-sign transfers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Erc20Contract {
    pub chain_id: u64,
    pub address: [u8; 20],
    pub symbol: &'static str,
    pub decimals: u8,
}

/// Lookup of whitelisted function selectors and token contracts.
///
/// The transaction parser only consumes the answers; the registry's
/// contents are owned elsewhere.
pub trait ContractRegistry {
    fn is_whitelisted_selector(&self, selector: &[u8; 4]) -> bool;

    fn find_contract(&self, chain_id: u64, address: &[u8; 20]) -> Option<Erc20Contract>;
}

const fn token(chain_id: u64, address: [u8; 20], symbol: &'static str, decimals: u8) -> Erc20Contract {
    Erc20Contract {
        chain_id,
        address,
        symbol,
        decimals,
    }
}

static BUILTIN_CONTRACTS: &[Erc20Contract] = &[
    token(1, hex!("dAC17F958D2ee523a2206206994597C13D831ec7"), "USDT", 6),
    token(1, hex!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"), "USDC", 6),
    token(1, hex!("6B175474E89094C44Da98b954EedeAC495271d0F"), "DAI", 18),
    token(137, hex!("2791Bca1f2de4661ED88A30C99A7a9449Aa84174"), "USDC", 6),
    token(137, hex!("c2132D05D31c914a87C6611C10748AEb04B58e8F"), "USDT", 6),
    token(56, hex!("55d398326f99059fF775485246999027B3197955"), "USDT", 18),
];

/// Static whitelist: the transfer selector plus a fixed contract table.
#[derive(Debug, Clone, Copy)]
pub struct Erc20Whitelist {
    contracts: &'static [Erc20Contract],
}

impl Erc20Whitelist {
    pub const fn new(contracts: &'static [Erc20Contract]) -> Self {
        Self { contracts }
    }

    pub const fn builtin() -> Self {
        Self::new(BUILTIN_CONTRACTS)
    }
}

impl Default for Erc20Whitelist {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ContractRegistry for Erc20Whitelist {
    fn is_whitelisted_selector(&self, selector: &[u8; 4]) -> bool {
        *selector == TRANSFER_SELECTOR
    }

    fn find_contract(&self, chain_id: u64, address: &[u8; 20]) -> Option<Erc20Contract> {
        self.contracts
            .iter()
            .find(|c| c.chain_id == chain_id && c.address == *address)
            .copied()
    }
}

/// Arguments of a decoded `transfer(address,uint256)` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferCall<'a> {
    pub recipient: &'a [u8; 20],
    /// Big-endian uint256.
    pub amount: &'a [u8; 32],
}

/// Decodes `transfer(address,uint256)` calldata.
///
/// Returns `None` unless the payload is exactly selector + two words and the
/// address word is left-padded with zeros.
pub fn decode_transfer(payload: &[u8]) -> Option<TransferCall<'_>> {
    if payload.len() != TRANSFER_CALLDATA_LEN || payload[..4] != TRANSFER_SELECTOR {
        return None;
    }
    let address_word = &payload[4..36];
    if address_word[..12].iter().any(|&b| b != 0) {
        return None;
    }
    Some(TransferCall {
        recipient: address_word[12..].try_into().ok()?,
        amount: payload[36..68].try_into().ok()?,
    })
}
