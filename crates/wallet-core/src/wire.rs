//! Decoders for the request structures the host sends alongside a
//! transaction or address request.
//!
//! Every decoder fills a freshly defaulted value through a
//! [`BoundedReader`] and returns it with the number of bytes consumed so
//! callers can reject trailing data. Decoded values are wiped on drop.

use wallet_utils::{BoundedReader, ReadError};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::coins;
use crate::error::WalletError;
use crate::types::{AddressRef, PathIndex};

/// Deepest path an add-coin request may carry.
pub const MAX_ADD_COIN_DEPTH: usize = 5;
pub const MIN_ADD_COIN_DEPTH: usize = 2;

fn read_index(reader: &mut BoundedReader<'_>) -> Result<PathIndex, ReadError> {
    Ok(PathIndex::from_bytes(reader.read_array()?))
}

fn read_ref(reader: &mut BoundedReader<'_>) -> Result<AddressRef, ReadError> {
    Ok(AddressRef {
        change: read_index(reader)?,
        address: read_index(reader)?,
    })
}

fn read_refs(reader: &mut BoundedReader<'_>, refs: &mut Vec<AddressRef>) -> Result<(), ReadError> {
    let count = reader.read_u8()?;
    refs.reserve_exact(usize::from(count));
    for _ in 0..count {
        refs.push(read_ref(reader)?);
    }
    Ok(())
}

fn read_token_name(reader: &mut BoundedReader<'_>) -> Result<String, WalletError> {
    let raw = reader.read_cstr()?;
    std::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(|_| WalletError::Decoding("token name is not valid UTF-8".into()))
}

fn consumed(reader: &BoundedReader<'_>) -> Result<usize, WalletError> {
    Ok(reader.offset().ok_or(ReadError::Poisoned)?)
}

/// Derivation and display metadata for a transaction to sign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct TxnMetadata {
    pub purpose: PathIndex,
    pub coin: PathIndex,
    pub account: PathIndex,
    pub inputs: Vec<AddressRef>,
    /// Count as sent by the host; exactly one output reference follows.
    pub output_count: u8,
    pub output: AddressRef,
    pub change: Vec<AddressRef>,
    pub fee: [u8; 8],
    pub token_name: String,
    pub chain_id: u64,
    pub is_token_transfer: bool,
    pub is_harmony_address: bool,
    pub address_tag: u16,
}

impl TxnMetadata {
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), WalletError> {
        Self::decode_from(BoundedReader::new(bytes))
    }

    /// Decodes from the first `size` bytes of `bytes`.
    pub fn decode_with_size(bytes: &[u8], size: usize) -> Result<(Self, usize), WalletError> {
        Self::decode_from(BoundedReader::with_declared_size(bytes, size)?)
    }

    fn decode_from(mut reader: BoundedReader<'_>) -> Result<(Self, usize), WalletError> {
        let mut metadata = Self::default();

        metadata.purpose = read_index(&mut reader)?;
        metadata.coin = read_index(&mut reader)?;
        metadata.account = read_index(&mut reader)?;
        read_refs(&mut reader, &mut metadata.inputs)?;
        metadata.output_count = reader.read_u8()?;
        metadata.output = read_ref(&mut reader)?;
        read_refs(&mut reader, &mut metadata.change)?;
        metadata.fee = reader.read_array()?;
        // reserved decimals byte; decimals come from the coin tables
        reader.skip(1)?;
        metadata.token_name = read_token_name(&mut reader)?;
        metadata.chain_id = reader.read_u64_be()?;
        metadata.is_harmony_address = reader.read_u8()? != 0;
        metadata.address_tag = reader.read_u16_be()?;

        let native = coins::coin_symbol(metadata.coin.to_unsigned(), metadata.chain_id)?;
        metadata.is_token_transfer = metadata.token_name != native;

        let consumed = consumed(&reader)?;
        Ok((metadata, consumed))
    }

    /// `purpose / coin / account / change / address` for `reference`.
    pub fn path_for(&self, reference: &AddressRef) -> [u32; 5] {
        [
            self.purpose.to_unsigned(),
            self.coin.to_unsigned(),
            self.account.to_unsigned(),
            reference.change.to_unsigned(),
            reference.address.to_unsigned(),
        ]
    }
}

/// A request to derive and display a receive address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ReceiveAddressData {
    pub wallet_id: [u8; 32],
    pub purpose: PathIndex,
    pub coin: PathIndex,
    pub account: PathIndex,
    pub change: PathIndex,
    pub address: PathIndex,
    pub token_name: String,
    pub chain_id: u64,
    pub address_tag: u16,
}

impl ReceiveAddressData {
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), WalletError> {
        Self::decode_from(BoundedReader::new(bytes))
    }

    /// Decodes from the first `size` bytes of `bytes`.
    pub fn decode_with_size(bytes: &[u8], size: usize) -> Result<(Self, usize), WalletError> {
        Self::decode_from(BoundedReader::with_declared_size(bytes, size)?)
    }

    fn decode_from(mut reader: BoundedReader<'_>) -> Result<(Self, usize), WalletError> {
        let mut data = Self::default();

        data.wallet_id = reader.read_array()?;
        data.purpose = read_index(&mut reader)?;
        data.coin = read_index(&mut reader)?;
        data.account = read_index(&mut reader)?;
        data.change = read_index(&mut reader)?;
        data.address = read_index(&mut reader)?;
        data.token_name = read_token_name(&mut reader)?;
        data.chain_id = reader.read_u64_be()?;
        data.address_tag = reader.read_u16_be()?;

        let consumed = consumed(&reader)?;
        Ok((data, consumed))
    }

    pub fn path(&self) -> [u32; 5] {
        [
            self.purpose.to_unsigned(),
            self.coin.to_unsigned(),
            self.account.to_unsigned(),
            self.change.to_unsigned(),
            self.address.to_unsigned(),
        ]
    }
}

/// A request to export the extended public key for a new coin account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AddCoinData {
    pub path: Vec<u32>,
    pub chain_id: u64,
}

impl AddCoinData {
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), WalletError> {
        Self::decode_from(BoundedReader::new(bytes))
    }

    pub fn decode_with_size(bytes: &[u8], size: usize) -> Result<(Self, usize), WalletError> {
        Self::decode_from(BoundedReader::with_declared_size(bytes, size)?)
    }

    fn decode_from(mut reader: BoundedReader<'_>) -> Result<(Self, usize), WalletError> {
        let mut data = Self::default();

        let depth = usize::from(reader.read_u8()?);
        if !(MIN_ADD_COIN_DEPTH..=MAX_ADD_COIN_DEPTH).contains(&depth) {
            #[cfg(feature = "log")]
            log::warn!("add-coin request with depth {depth}");
            return Err(WalletError::Decoding(format!(
                "derivation depth {depth} outside {MIN_ADD_COIN_DEPTH}..={MAX_ADD_COIN_DEPTH}"
            )));
        }
        data.path.reserve_exact(depth);
        for _ in 0..depth {
            data.path.push(reader.read_u32_be()?);
        }
        data.chain_id = reader.read_u64_be()?;

        let consumed = consumed(&reader)?;
        Ok((data, consumed))
    }
}
