//! EVM signing flow: metadata policy, transaction decode and
//! classification, then signing with the first input's key.

use chain_eth::{ContractRegistry, EvmTxnSummary, EvmUnsignedTxn, PayloadStatus, ValidatedEvmTxn};

use crate::coins::ETHEREUM;
use crate::encoding::bech32_addr_encode;
use crate::error::WalletError;
use crate::path_policy::require_valid_metadata;
use crate::signer::{sign, MessageDigest, Signature};
use crate::types::Curve;
use crate::wire::TxnMetadata;

const HARMONY_HRP: &str = "one";

fn require_evm_metadata(metadata: &TxnMetadata) -> Result<(), WalletError> {
    require_valid_metadata(metadata)?;
    let coin = metadata.coin.to_unsigned();
    if coin != ETHEREUM {
        return Err(WalletError::UnsupportedCoin(coin));
    }
    Ok(())
}

/// Decodes `unsigned` and checks it against `metadata`.
///
/// Transactions whose payload names a contract other than the claimed token
/// are refused here; blind-signing payloads are returned for the caller to
/// confirm explicitly.
pub fn prepare_evm_txn<'a, R: ContractRegistry + ?Sized>(
    metadata: &TxnMetadata,
    unsigned: &'a [u8],
    registry: &R,
) -> Result<(ValidatedEvmTxn<'a>, EvmTxnSummary), WalletError> {
    require_evm_metadata(metadata)?;

    let claimed_token = metadata
        .is_token_transfer
        .then_some(metadata.token_name.as_str());
    let validated = EvmUnsignedTxn::decode(unsigned)?.validate(
        metadata.chain_id,
        claimed_token,
        registry,
    )?;

    match (validated.payload_status(), claimed_token) {
        (PayloadStatus::ContractInvalid, _) => {
            return Err(WalletError::InvalidArguments(
                "payload does not match the claimed token contract".into(),
            ))
        }
        (PayloadStatus::Absent, Some(token)) => {
            return Err(WalletError::InvalidArguments(format!(
                "token transfer of {token} carries no calldata"
            )))
        }
        _ => {}
    }

    #[cfg(feature = "log")]
    if validated.requires_blind_signing() {
        log::warn!("evm payload on chain {} requires blind signing", metadata.chain_id);
    }

    let summary = validated.summary()?;
    Ok((validated, summary))
}

/// Signs the exact bytes of a prepared transaction with the key of the
/// first input reference.
pub fn sign_evm_txn(
    metadata: &TxnMetadata,
    validated: &ValidatedEvmTxn<'_>,
    seed: &[u8],
) -> Result<Signature, WalletError> {
    require_evm_metadata(metadata)?;
    if validated.chain().chain_id != metadata.chain_id {
        return Err(WalletError::InvalidArguments(
            "transaction chain differs from metadata".into(),
        ));
    }
    let input = metadata
        .inputs
        .first()
        .ok_or_else(|| WalletError::InvalidArguments("no input reference".into()))?;

    sign(
        &metadata.path_for(input),
        Curve::Secp256k1,
        seed,
        validated.txn().encoded(),
        MessageDigest::Keccak256,
    )
}

/// EIP-155 `v` for a signature on `chain_id`.
pub fn eip155_v(chain_id: u64, recovery_id: u8) -> Result<u64, WalletError> {
    chain_id
        .checked_mul(2)
        .and_then(|v| v.checked_add(35 + u64::from(recovery_id)))
        .ok_or_else(|| WalletError::InvalidArguments(format!("chain id {chain_id} overflows v")))
}

/// Recipient as displayed: `one1...` when the host asked for a Harmony
/// address, EIP-55 otherwise.
pub fn display_recipient(
    metadata: &TxnMetadata,
    summary: &EvmTxnSummary,
) -> Result<String, WalletError> {
    if metadata.is_harmony_address {
        bech32_addr_encode(HARMONY_HRP, &summary.recipient)
    } else {
        Ok(chain_eth::checksum_address(&summary.recipient))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coins::{BITCOIN, NATIVE_SEGWIT, NON_SEGWIT};
    use crate::hd_derivation::derive_hdnode_from_path;
    use crate::mnemonic::mnemonic_to_seed;
    use crate::types::{AddressRef, PathIndex, HARDENED};
    use alloy_primitives::U256;
    use alloy_rlp::{Encodable, Header};
    use chain_eth::erc20::TRANSFER_SELECTOR;
    use chain_eth::Erc20Whitelist;
    use hex_literal::hex;
    use k256::ecdsa::{RecoveryId, VerifyingKey};
    use wallet_utils::hash::keccak256;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const USDT: [u8; 20] = hex!("dAC17F958D2ee523a2206206994597C13D831ec7");
    const RECIPIENT: [u8; 20] = hex!("000000000000000000000000000000000000dEaD");

    fn metadata(token: &str, chain_id: u64) -> TxnMetadata {
        let mut m = TxnMetadata::default();
        m.purpose = PathIndex::from_u32(NON_SEGWIT);
        m.coin = PathIndex::from_u32(ETHEREUM);
        m.account = PathIndex::hardened(0);
        m.inputs = vec![AddressRef::new(0u32, 0u32)];
        m.output_count = 1;
        m.token_name = token.into();
        m.chain_id = chain_id;
        m.is_token_transfer = crate::coins::coin_symbol(ETHEREUM, chain_id).unwrap() != token;
        m
    }

    fn legacy_txn(to: &[u8; 20], value: u64, data: &[u8], chain_id: u64) -> Vec<u8> {
        let mut payload = Vec::new();
        3u64.encode(&mut payload);
        20_000_000_000u64.encode(&mut payload);
        60_000u64.encode(&mut payload);
        to.as_slice().encode(&mut payload);
        value.encode(&mut payload);
        data.encode(&mut payload);
        chain_id.encode(&mut payload);
        0u64.encode(&mut payload);
        0u64.encode(&mut payload);

        let mut out = Vec::new();
        Header {
            list: true,
            payload_length: payload.len(),
        }
        .encode(&mut out);
        out.extend_from_slice(&payload);
        out
    }

    fn transfer_calldata(recipient: &[u8; 20], amount: u64) -> Vec<u8> {
        let mut data = TRANSFER_SELECTOR.to_vec();
        data.extend_from_slice(&[0; 12]);
        data.extend_from_slice(recipient);
        data.extend_from_slice(&[0; 24]);
        data.extend_from_slice(&amount.to_be_bytes());
        data
    }

    #[test]
    fn native_transfer_summary() {
        let bytes = legacy_txn(&RECIPIENT, 1_000_000_000_000_000_000, &[], 1);
        let (validated, summary) =
            prepare_evm_txn(&metadata("ETH", 1), &bytes, &Erc20Whitelist::builtin()).unwrap();
        assert_eq!(validated.payload_status(), PayloadStatus::Absent);
        assert_eq!(summary.recipient, RECIPIENT);
        assert_eq!(summary.amount, U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(summary.fee, U256::from(20_000_000_000u64 * 60_000));
        assert_eq!(summary.symbol, "ETH");
    }

    #[test]
    fn whitelisted_token_transfer_summary() {
        let calldata = transfer_calldata(&RECIPIENT, 2_500_000);
        let bytes = legacy_txn(&USDT, 0, &calldata, 1);
        let (validated, summary) =
            prepare_evm_txn(&metadata("USDT", 1), &bytes, &Erc20Whitelist::builtin()).unwrap();
        assert_eq!(validated.payload_status(), PayloadStatus::Whitelisted);
        assert_eq!(summary.recipient, RECIPIENT);
        assert_eq!(summary.amount, U256::from(2_500_000u64));
        assert_eq!(summary.symbol, "USDT");
        assert_eq!(summary.decimals, 6);
        assert_eq!(summary.contract_address, Some(USDT));
    }

    #[test]
    fn claimed_token_mismatch_is_refused() {
        let calldata = transfer_calldata(&RECIPIENT, 1);
        let bytes = legacy_txn(&USDT, 0, &calldata, 1);
        let result = prepare_evm_txn(&metadata("USDC", 1), &bytes, &Erc20Whitelist::builtin());
        assert!(matches!(result, Err(WalletError::InvalidArguments(_))));
    }

    #[test]
    fn token_claim_without_calldata_is_refused() {
        let bytes = legacy_txn(&USDT, 5, &[], 1);
        let result = prepare_evm_txn(&metadata("USDT", 1), &bytes, &Erc20Whitelist::builtin());
        assert!(matches!(result, Err(WalletError::InvalidArguments(_))));
    }

    #[test]
    fn unknown_selector_requires_blind_signing() {
        let bytes = legacy_txn(&RECIPIENT, 0, &hex!("095ea7b3"), 1);
        let (validated, summary) =
            prepare_evm_txn(&metadata("ETH", 1), &bytes, &Erc20Whitelist::builtin()).unwrap();
        assert!(validated.requires_blind_signing());
        assert_eq!(summary.payload_status, PayloadStatus::SignatureNotWhitelisted);
    }

    #[test]
    fn chain_id_must_match_metadata() {
        let bytes = legacy_txn(&RECIPIENT, 1, &[], 137);
        let result = prepare_evm_txn(&metadata("ETH", 1), &bytes, &Erc20Whitelist::builtin());
        assert!(matches!(result, Err(WalletError::InvalidArguments(_))));
    }

    #[test]
    fn non_evm_metadata_is_refused() {
        let mut m = metadata("ETH", 1);
        m.purpose = PathIndex::from_u32(NATIVE_SEGWIT);
        m.coin = PathIndex::from_u32(BITCOIN);
        m.token_name = "BTC".into();
        let bytes = legacy_txn(&RECIPIENT, 1, &[], 1);
        assert!(matches!(
            prepare_evm_txn(&m, &bytes, &Erc20Whitelist::builtin()),
            Err(WalletError::UnsupportedCoin(_))
        ));
    }

    #[test]
    fn invalid_metadata_is_refused_before_decoding() {
        let mut m = metadata("ETH", 1);
        m.inputs = vec![AddressRef::new(HARDENED, 0u32)];
        assert!(matches!(
            prepare_evm_txn(&m, &[0xff], &Erc20Whitelist::builtin()),
            Err(WalletError::PolicyViolation(_))
        ));
    }

    #[test]
    fn signature_recovers_to_input_key() {
        let seed = mnemonic_to_seed(TEST_MNEMONIC, "").unwrap();
        let m = metadata("ETH", 1);
        let bytes = legacy_txn(&RECIPIENT, 7, &[], 1);
        let (validated, _) = prepare_evm_txn(&m, &bytes, &Erc20Whitelist::builtin()).unwrap();

        let Signature::Ecdsa { rs, recovery_id } = sign_evm_txn(&m, &validated, &seed).unwrap()
        else {
            panic!("expected an ECDSA signature");
        };
        let recovered = VerifyingKey::recover_from_prehash(
            &keccak256(&bytes),
            &k256::ecdsa::Signature::from_slice(&rs).unwrap(),
            RecoveryId::from_byte(recovery_id).unwrap(),
        )
        .unwrap();
        let node = derive_hdnode_from_path(
            &[NON_SEGWIT, ETHEREUM, HARDENED, 0, 0],
            Curve::Secp256k1,
            &seed,
        )
        .unwrap();
        assert_eq!(
            recovered.to_encoded_point(true).as_bytes(),
            node.public_key().unwrap()
        );
        let v = eip155_v(1, recovery_id).unwrap();
        assert!(v == 37 || v == 38);
    }

    #[test]
    fn eip155_v_values_and_overflow() {
        assert_eq!(eip155_v(1, 0).unwrap(), 37);
        assert_eq!(eip155_v(137, 1).unwrap(), 310);
        assert_eq!(eip155_v(1_666_600_000, 0).unwrap(), 3_333_200_035);
        assert!(matches!(
            eip155_v(u64::MAX / 2, 1),
            Err(WalletError::InvalidArguments(_))
        ));
        assert!(eip155_v(u64::MAX, 0).is_err());
    }

    #[test]
    fn harmony_recipient_display() {
        let mut m = metadata("ONE", 1_666_600_000);
        let bytes = legacy_txn(&RECIPIENT, 1, &[], 1_666_600_000);
        let (_, summary) = prepare_evm_txn(&m, &bytes, &Erc20Whitelist::builtin()).unwrap();
        assert_eq!(
            display_recipient(&m, &summary).unwrap(),
            "0x000000000000000000000000000000000000dEaD"
        );
        m.is_harmony_address = true;
        assert!(display_recipient(&m, &summary).unwrap().starts_with("one1"));
    }
}
