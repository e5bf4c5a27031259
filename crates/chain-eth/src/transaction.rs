//! Legacy EIP-155 unsigned transactions.
//!
//! The host sends the exact bytes the device will hash and sign:
//!
//! ```text
//! rlp([nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0])
//! ```
//!
//! Decoding copies the small integer fields into explicit-length arrays and
//! borrows the calldata from the caller's buffer. Nothing can be displayed
//! before [`EvmUnsignedTxn::validate`] has classified the payload; the
//! summary is only reachable through the resulting [`ValidatedEvmTxn`].

use alloy_primitives::U256;
use alloy_rlp::Header;
use serde::Serialize;

use crate::chains::{self, EvmChain};
use crate::erc20::{self, ContractRegistry, Erc20Contract};
use crate::error::EthError;

// ---------------------------------------------------------------------------
// Field storage
// ---------------------------------------------------------------------------

/// A big-endian integer of at most `N` bytes, stored with its wire length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizedBytes<const N: usize> {
    len: usize,
    bytes: [u8; N],
}

impl<const N: usize> SizedBytes<N> {
    fn from_field(field: &'static str, data: &[u8]) -> Result<Self, EthError> {
        if data.len() > N {
            return Err(EthError::FieldTooLong {
                field,
                len: data.len(),
                max: N,
            });
        }
        let mut bytes = [0u8; N];
        bytes[..data.len()].copy_from_slice(data);
        Ok(Self {
            len: data.len(),
            bytes,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Numeric value; every instance used in this crate fits in 32 bytes.
    pub fn to_u256(&self) -> U256 {
        U256::from_be_slice(self.as_slice())
    }
}

// ---------------------------------------------------------------------------
// Payload classification
// ---------------------------------------------------------------------------

/// How much of the calldata the device can explain to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PayloadStatus {
    /// No calldata: a plain native-asset transfer.
    Absent,
    /// Selector not recognized; requires blind signing.
    SignatureNotWhitelisted,
    /// Superseded by `ContractInvalid`; never produced.
    ContractNotWhitelisted,
    /// Recognized selector sent to a contract that is not the claimed token.
    ContractInvalid,
    /// Fully recognized; clear signing.
    Whitelisted,
}

/// Classifies calldata sent to `to` on `chain_id`.
///
/// `claimed_token` is the asset symbol the host says is being moved, `None`
/// for the chain's native asset.
pub fn classify_payload<R: ContractRegistry + ?Sized>(
    payload: &[u8],
    to: &[u8; 20],
    chain_id: u64,
    claimed_token: Option<&str>,
    registry: &R,
) -> (PayloadStatus, Option<Erc20Contract>) {
    let Some(selector) = payload.get(..4) else {
        return if payload.is_empty() {
            (PayloadStatus::Absent, None)
        } else {
            (PayloadStatus::SignatureNotWhitelisted, None)
        };
    };
    let selector: [u8; 4] = [selector[0], selector[1], selector[2], selector[3]];

    if !registry.is_whitelisted_selector(&selector) || erc20::decode_transfer(payload).is_none() {
        return (PayloadStatus::SignatureNotWhitelisted, None);
    }

    match registry.find_contract(chain_id, to) {
        Some(contract) if claimed_token == Some(contract.symbol) => {
            (PayloadStatus::Whitelisted, Some(contract))
        }
        _ => (PayloadStatus::ContractInvalid, None),
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Splits the next RLP item off `buf` and returns its payload.
fn take_item<'a>(buf: &mut &'a [u8], list: bool) -> Result<&'a [u8], EthError> {
    let header = Header::decode(buf).map_err(|e| EthError::DecodingError(e.to_string()))?;
    if header.list != list {
        return Err(EthError::DecodingError(if list {
            "expected a list".into()
        } else {
            "expected a string".into()
        }));
    }
    if header.payload_length > buf.len() {
        return Err(EthError::DecodingError(format!(
            "item of {} bytes overruns buffer of {}",
            header.payload_length,
            buf.len()
        )));
    }
    let (payload, rest) = buf.split_at(header.payload_length);
    *buf = rest;
    Ok(payload)
}

/// A decoded, not yet validated, legacy EIP-155 transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmUnsignedTxn<'a> {
    pub nonce: SizedBytes<32>,
    pub gas_price: SizedBytes<32>,
    pub gas_limit: SizedBytes<32>,
    pub to_address: [u8; 20],
    pub value: SizedBytes<32>,
    /// Calldata, borrowed from the caller's buffer.
    pub payload: &'a [u8],
    pub chain_id: SizedBytes<8>,
    pub dummy_r: SizedBytes<1>,
    pub dummy_s: SizedBytes<1>,
    encoded: &'a [u8],
}

impl<'a> EvmUnsignedTxn<'a> {
    /// Decodes `bytes`, which must hold exactly one RLP list.
    pub fn decode(bytes: &'a [u8]) -> Result<Self, EthError> {
        let mut buf = bytes;
        let mut fields = take_item(&mut buf, true)?;
        if !buf.is_empty() {
            return Err(EthError::DecodingError(format!(
                "{} trailing bytes after transaction",
                buf.len()
            )));
        }

        let nonce = SizedBytes::from_field("nonce", take_item(&mut fields, false)?)?;
        let gas_price = SizedBytes::from_field("gas price", take_item(&mut fields, false)?)?;
        let gas_limit = SizedBytes::from_field("gas limit", take_item(&mut fields, false)?)?;
        let to = take_item(&mut fields, false)?;
        let to_address: [u8; 20] = to.try_into().map_err(|_| {
            EthError::DecodingError(format!("recipient must be 20 bytes, got {}", to.len()))
        })?;
        let value = SizedBytes::from_field("value", take_item(&mut fields, false)?)?;
        let payload = take_item(&mut fields, false)?;
        let chain_id = SizedBytes::from_field("chain id", take_item(&mut fields, false)?)?;
        let dummy_r = SizedBytes::from_field("r", take_item(&mut fields, false)?)?;
        let dummy_s = SizedBytes::from_field("s", take_item(&mut fields, false)?)?;

        if !fields.is_empty() {
            return Err(EthError::DecodingError("unexpected extra fields".into()));
        }

        Ok(Self {
            nonce,
            gas_price,
            gas_limit,
            to_address,
            value,
            payload,
            chain_id,
            dummy_r,
            dummy_s,
            encoded: bytes,
        })
    }

    /// The exact bytes that were decoded; these are what gets signed.
    pub fn encoded(&self) -> &'a [u8] {
        self.encoded
    }

    pub fn chain_id_value(&self) -> u64 {
        self.chain_id
            .as_slice()
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
    }

    /// Checks field consistency against the request and classifies the
    /// payload.
    ///
    /// The chain id must be present, known and equal to `expected_chain_id`;
    /// the EIP-155 signature placeholders must be empty.
    pub fn validate<R: ContractRegistry + ?Sized>(
        self,
        expected_chain_id: u64,
        claimed_token: Option<&str>,
        registry: &R,
    ) -> Result<ValidatedEvmTxn<'a>, EthError> {
        if self.chain_id.is_empty() {
            return Err(EthError::InvalidTransaction("missing chain id".into()));
        }
        let chain_id = self.chain_id_value();
        if chain_id != expected_chain_id {
            return Err(EthError::ChainIdMismatch {
                expected: expected_chain_id,
                actual: chain_id,
            });
        }
        let chain = chains::get_chain(chain_id).ok_or(EthError::UnsupportedChain(chain_id))?;
        if !self.dummy_r.is_empty() || !self.dummy_s.is_empty() {
            return Err(EthError::InvalidTransaction(
                "signature placeholders must be zero".into(),
            ));
        }

        let (payload_status, contract) = classify_payload(
            self.payload,
            &self.to_address,
            chain_id,
            claimed_token,
            registry,
        );
        #[cfg(feature = "log")]
        log::debug!("evm payload on chain {chain_id} classified as {payload_status:?}");

        Ok(ValidatedEvmTxn {
            txn: self,
            chain,
            payload_status,
            contract,
        })
    }
}

// ---------------------------------------------------------------------------
// Validated transaction and summary
// ---------------------------------------------------------------------------

/// A transaction whose payload has been classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEvmTxn<'a> {
    txn: EvmUnsignedTxn<'a>,
    chain: &'static EvmChain,
    payload_status: PayloadStatus,
    contract: Option<Erc20Contract>,
}

/// Raw values for the confirmation screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmTxnSummary {
    pub recipient: [u8; 20],
    pub amount: U256,
    /// `gas_price * gas_limit`, in the native asset's base unit.
    pub fee: U256,
    pub symbol: &'static str,
    pub decimals: u8,
    pub native_symbol: &'static str,
    pub payload_status: PayloadStatus,
    /// Contract being called, if the payload is non-empty.
    pub contract_address: Option<[u8; 20]>,
}

impl<'a> ValidatedEvmTxn<'a> {
    pub fn txn(&self) -> &EvmUnsignedTxn<'a> {
        &self.txn
    }

    pub fn chain(&self) -> &'static EvmChain {
        self.chain
    }

    pub fn payload_status(&self) -> PayloadStatus {
        self.payload_status
    }

    pub fn contract(&self) -> Option<&Erc20Contract> {
        self.contract.as_ref()
    }

    pub fn requires_blind_signing(&self) -> bool {
        self.payload_status == PayloadStatus::SignatureNotWhitelisted
    }

    /// Builds the display summary. Refused for `ContractInvalid`, and for
    /// token transfers that also carry native value.
    pub fn summary(&self) -> Result<EvmTxnSummary, EthError> {
        let fee = self
            .txn
            .gas_price
            .to_u256()
            .checked_mul(self.txn.gas_limit.to_u256())
            .ok_or_else(|| EthError::InvalidTransaction("fee overflow".into()))?;

        let contract_address = (!self.txn.payload.is_empty()).then_some(self.txn.to_address);
        let native = EvmTxnSummary {
            recipient: self.txn.to_address,
            amount: self.txn.value.to_u256(),
            fee,
            symbol: self.chain.symbol,
            decimals: self.chain.decimals,
            native_symbol: self.chain.symbol,
            payload_status: self.payload_status,
            contract_address,
        };

        match (self.payload_status, self.contract) {
            (PayloadStatus::Absent | PayloadStatus::SignatureNotWhitelisted, _) => Ok(native),
            (PayloadStatus::Whitelisted, Some(contract)) => {
                if !self.txn.value.to_u256().is_zero() {
                    return Err(EthError::InvalidTransaction(
                        "token transfer also moves native value".into(),
                    ));
                }
                let call = erc20::decode_transfer(self.txn.payload).ok_or_else(|| {
                    EthError::InvalidTransaction("whitelisted payload is not a transfer".into())
                })?;
                Ok(EvmTxnSummary {
                    recipient: *call.recipient,
                    amount: U256::from_be_bytes(*call.amount),
                    symbol: contract.symbol,
                    decimals: contract.decimals,
                    ..native
                })
            }
            _ => Err(EthError::InvalidTransaction(
                "payload does not match the claimed token contract".into(),
            )),
        }
    }
}
