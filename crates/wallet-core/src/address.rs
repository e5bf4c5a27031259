use serde::Serialize;

use crate::coins::{self, BITCOIN, BTC_TEST, ETHEREUM, NATIVE_SEGWIT, NEAR, SOLANA};
use crate::encoding::bech32_addr_encode;
use crate::error::WalletError;
use crate::hd_derivation::{derive_hdnode_from_path, HdNode};
use crate::path_policy::{self, path_to_string};
use crate::wire::ReceiveAddressData;

/// Address shown on the device for a receive request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiveAddress {
    pub address: String,
    pub derivation_path: String,
    pub coin_name: &'static str,
    pub token: String,
}

/// Encodes the public key of `node` the way `coin` displays addresses.
///
/// `path` is the derivation path of `node`; `chain_id` selects the EVM
/// chain for the Ethereum coin index.
pub fn encode_address(node: &HdNode, path: &[u32], chain_id: u64) -> Result<String, WalletError> {
    let [purpose, coin, ..] = *path else {
        return Err(WalletError::InvalidArguments("address path too short".into()));
    };

    match coin {
        BITCOIN | BTC_TEST if purpose == NATIVE_SEGWIT => {
            let network = if coin == BITCOIN {
                chain_btc::Network::Bitcoin
            } else {
                chain_btc::Network::Testnet
            };
            Ok(chain_btc::pubkey_to_p2wpkh_address(node.public_key()?, network)?)
        }
        c if coins::is_btc_family(c) => {
            let version = coins::version_bytes(purpose, coin)?;
            Ok(chain_btc::pubkey_to_p2pkh_address(node.public_key()?, version.address)?)
        }
        ETHEREUM => {
            let chain = chain_eth::get_chain(chain_id).ok_or(WalletError::UnsupportedChain(chain_id))?;
            let address = chain_eth::pubkey_to_address(node.public_key()?)?;
            match chain.bech32_hrp {
                Some(hrp) => bech32_addr_encode(hrp, &address),
                None => Ok(chain_eth::checksum_address(&address)),
            }
        }
        // implicit account id: hex of the ed25519 key
        NEAR => Ok(hex::encode(node.ed25519_public_key()?)),
        SOLANA => Ok(chain_sol::pubkey_to_address(&node.ed25519_public_key()?)),
        _ => Err(WalletError::UnsupportedCoin(coin)),
    }
}

/// Validates the requested path, derives the leaf and encodes its address.
pub fn derive_receive_address(
    request: &ReceiveAddressData,
    seed: &[u8],
) -> Result<ReceiveAddress, WalletError> {
    let path = request.path();
    path_policy::require_receive_path(&path)?;

    let coin = path[1];
    let curve = coins::coin_curve(coin)?;
    let node = derive_hdnode_from_path(&path, curve, seed)?;
    let address = encode_address(&node, &path, request.chain_id)?;

    Ok(ReceiveAddress {
        address,
        derivation_path: path_to_string(&path, false),
        coin_name: coins::coin_name(coin, request.chain_id)?,
        token: request.token_name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coins::{DOGE, LITECOIN, NON_SEGWIT};
    use crate::mnemonic::mnemonic_to_seed;
    use crate::types::{PathIndex, HARDENED};

    const H: u32 = HARDENED;
    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn seed() -> wallet_utils::Seed {
        mnemonic_to_seed(TEST_MNEMONIC, "").unwrap()
    }

    fn request(path: [u32; 5], token: &str, chain_id: u64) -> ReceiveAddressData {
        let mut data = ReceiveAddressData::default();
        data.purpose = PathIndex::from_u32(path[0]);
        data.coin = PathIndex::from_u32(path[1]);
        data.account = PathIndex::from_u32(path[2]);
        data.change = PathIndex::from_u32(path[3]);
        data.address = PathIndex::from_u32(path[4]);
        data.token_name = token.into();
        data.chain_id = chain_id;
        data
    }

    #[test]
    fn bip84_first_address() {
        let seed = seed();
        let address =
            derive_receive_address(&request([NATIVE_SEGWIT, BITCOIN, H, 0, 0], "BTC", 0), &seed)
                .unwrap();
        assert_eq!(address.address, "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu");
        assert_eq!(address.derivation_path, "m/84'/0'/0'/0/0");
        assert_eq!(address.coin_name, "Bitcoin");
    }

    #[test]
    fn testnet_segwit_uses_tb_prefix() {
        let seed = seed();
        let address =
            derive_receive_address(&request([NATIVE_SEGWIT, BTC_TEST, H, 0, 0], "BTC", 0), &seed)
                .unwrap();
        assert!(address.address.starts_with("tb1q"));
    }

    #[test]
    fn legacy_addresses_use_coin_version() {
        let seed = seed();
        let btc = derive_receive_address(&request([NON_SEGWIT, BITCOIN, H, 0, 0], "BTC", 0), &seed)
            .unwrap();
        assert!(btc.address.starts_with('1'));

        let ltc =
            derive_receive_address(&request([NON_SEGWIT, LITECOIN, H, 0, 0], "LTC", 0), &seed)
                .unwrap();
        assert!(ltc.address.starts_with('L'));

        let doge = derive_receive_address(&request([NON_SEGWIT, DOGE, H, 0, 0], "DOGE", 0), &seed)
            .unwrap();
        assert!(doge.address.starts_with('D'));
    }

    #[test]
    fn eth_address_of_test_mnemonic() {
        let seed = seed();
        let address =
            derive_receive_address(&request([NON_SEGWIT, ETHEREUM, H, 0, 0], "ETH", 1), &seed)
                .unwrap();
        assert_eq!(address.address, "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
        assert_eq!(address.coin_name, "Ethereum");

        let polygon =
            derive_receive_address(&request([NON_SEGWIT, ETHEREUM, H, 0, 0], "USDC", 137), &seed)
                .unwrap();
        assert_eq!(polygon.address, address.address);
        assert_eq!(polygon.coin_name, "Polygon");
        assert_eq!(polygon.token, "USDC");
    }

    #[test]
    fn harmony_uses_bech32() {
        let seed = seed();
        let address = derive_receive_address(
            &request([NON_SEGWIT, ETHEREUM, H, 0, 0], "ONE", 1_666_600_000),
            &seed,
        )
        .unwrap();
        assert!(address.address.starts_with("one1"));
        assert_eq!(address.address.len(), 42);
    }

    #[test]
    fn near_and_solana_use_ed25519_keys() {
        let seed = seed();
        let near = derive_receive_address(&request([NON_SEGWIT, NEAR, H, H, H], "NEAR", 0), &seed)
            .unwrap();
        assert_eq!(near.address.len(), 64);
        assert!(near.address.chars().all(|c| c.is_ascii_hexdigit()));

        let sol = derive_receive_address(&request([NON_SEGWIT, SOLANA, H, H, H], "SOL", 0), &seed)
            .unwrap();
        let decoded = bs58::decode(&sol.address).into_vec().unwrap();
        assert_eq!(decoded.len(), 32);
        assert_eq!(sol.derivation_path, "m/44'/501'/0'/0'/0'");
    }

    #[test]
    fn policy_runs_before_derivation() {
        let seed = seed();
        let result =
            derive_receive_address(&request([NON_SEGWIT, ETHEREUM, H, 0, 1], "ETH", 1), &seed);
        assert!(matches!(result, Err(WalletError::PolicyViolation(_))));

        let result =
            derive_receive_address(&request([NATIVE_SEGWIT, DOGE, H, 0, 0], "DOGE", 0), &seed);
        assert!(matches!(result, Err(WalletError::PolicyViolation(_))));
    }

    #[test]
    fn unknown_evm_chain_fails() {
        let seed = seed();
        let result =
            derive_receive_address(&request([NON_SEGWIT, ETHEREUM, H, 0, 0], "ETH", 3), &seed);
        assert!(matches!(result, Err(WalletError::UnsupportedChain(3))));
    }
}
