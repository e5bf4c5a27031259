use serde::Serialize;

/// Definition of an EVM-compatible network the device can sign for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvmChain {
    pub chain_id: u64,
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
    /// Human-readable prefix when the chain displays bech32 addresses.
    pub bech32_hrp: Option<&'static str>,
}

const fn evm_chain(chain_id: u64, name: &'static str, symbol: &'static str) -> EvmChain {
    EvmChain {
        chain_id,
        name,
        symbol,
        decimals: 18,
        bech32_hrp: None,
    }
}

pub const ETHEREUM: EvmChain = evm_chain(1, "Ethereum", "ETH");
pub const OPTIMISM: EvmChain = evm_chain(10, "Optimism", "ETH");
pub const BSC: EvmChain = evm_chain(56, "BNB Smart Chain", "BNB");
pub const ETHEREUM_CLASSIC: EvmChain = evm_chain(61, "Ethereum Classic", "ETC");
pub const POLYGON: EvmChain = evm_chain(137, "Polygon", "MATIC");
pub const FANTOM: EvmChain = evm_chain(250, "Fantom", "FTM");
pub const ARBITRUM: EvmChain = evm_chain(42161, "Arbitrum", "ETH");
pub const AVALANCHE: EvmChain = evm_chain(43114, "Avalanche C-Chain", "AVAX");

/// Harmony shard 0; addresses are shown as `one1...`.
pub const HARMONY: EvmChain = EvmChain {
    bech32_hrp: Some("one"),
    ..evm_chain(1_666_600_000, "Harmony", "ONE")
};

const ALL_CHAINS: &[&EvmChain] = &[
    &ETHEREUM,
    &OPTIMISM,
    &BSC,
    &ETHEREUM_CLASSIC,
    &POLYGON,
    &FANTOM,
    &ARBITRUM,
    &AVALANCHE,
    &HARMONY,
];

/// Returns the chain definition for a given chain ID, or `None` if unsupported.
pub fn get_chain(chain_id: u64) -> Option<&'static EvmChain> {
    ALL_CHAINS.iter().find(|c| c.chain_id == chain_id).copied()
}

pub fn supported_chains() -> &'static [&'static EvmChain] {
    ALL_CHAINS
}
