//! Unsigned Solana message decoding.
//!
//! ```text
//! Message:
//!   num_required_sigs     u8
//!   num_readonly_signed   u8
//!   num_readonly_unsigned u8
//!   num_accounts          compact-u16
//!   account_keys          32 bytes * num_accounts
//!   recent_blockhash      32 bytes
//!   num_instructions      compact-u16   (must be 1)
//!   instruction:
//!     program_id_index    u8            (must name the System Program)
//!     num_accounts        compact-u16
//!     account_indices     u8 * num_accounts
//!     data_len            compact-u16
//!     data                u8 * data_len (Transfer: u32 LE 2, u64 LE lamports)
//! ```

use wallet_utils::BoundedReader;

use crate::error::SolError;

// ---------------------------------------------------------------------------
// Solana System Program
// ---------------------------------------------------------------------------

/// The Solana System Program public key: 32 zero bytes.
/// Base58: `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0u8; 32];

/// System Program `Transfer` instruction index (little-endian u32).
const SYSTEM_TRANSFER_IX_INDEX: u32 = 2;

/// Discriminant plus lamports.
const TRANSFER_DATA_LEN: usize = 12;

/// Versioned (v0+) messages set the top bit of the first header byte.
const VERSIONED_MESSAGE_PREFIX: u8 = 0x80;

const PUBKEY_LEN: usize = 32;

fn unsupported(reason: impl Into<String>) -> SolError {
    let reason = reason.into();
    #[cfg(feature = "log")]
    log::warn!("refusing solana transaction: {reason}");
    SolError::UnsupportedTransaction(reason)
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,
}

/// The single compiled instruction, with views into the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolanaInstruction<'a> {
    pub program_id_index: u8,
    pub account_indices: &'a [u8],
    pub data: &'a [u8],
}

/// A decoded System Program `Transfer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemTransfer<'a> {
    pub funding_account: &'a [u8; 32],
    pub recipient_account: &'a [u8; 32],
    pub lamports: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolanaUnsignedTxn<'a> {
    pub header: MessageHeader,
    account_keys: &'a [u8],
    pub recent_blockhash: &'a [u8; 32],
    pub instruction: SolanaInstruction<'a>,
    pub transfer: SystemTransfer<'a>,
    encoded: &'a [u8],
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

impl<'a> SolanaUnsignedTxn<'a> {
    /// Decodes a complete unsigned message; trailing bytes are rejected.
    pub fn decode(bytes: &'a [u8]) -> Result<Self, SolError> {
        let mut reader = BoundedReader::new(bytes);

        let header = MessageHeader {
            num_required_signatures: reader.read_u8()?,
            num_readonly_signed: reader.read_u8()?,
            num_readonly_unsigned: reader.read_u8()?,
        };
        if header.num_required_signatures & VERSIONED_MESSAGE_PREFIX != 0 {
            return Err(unsupported("versioned message"));
        }
        if header.num_required_signatures == 0 {
            return Err(unsupported("no required signatures"));
        }

        let account_count = usize::from(reader.read_compact_u16()?);
        let account_keys = reader.read(account_count * PUBKEY_LEN)?;
        if account_count < usize::from(header.num_required_signatures) {
            return Err(unsupported("fewer accounts than required signatures"));
        }

        let recent_blockhash = reader.read_array_ref::<32>()?;

        let instruction_count = reader.read_compact_u16()?;
        if instruction_count != 1 {
            return Err(unsupported(format!("{instruction_count} instructions")));
        }

        let program_id_index = reader.read_u8()?;
        let program_id = account_at(account_keys, program_id_index)?;
        if *program_id != SYSTEM_PROGRAM_ID {
            return Err(unsupported("program is not the system program"));
        }

        let index_count = usize::from(reader.read_compact_u16()?);
        let account_indices = reader.read(index_count)?;
        let data_len = usize::from(reader.read_compact_u16()?);
        let data = reader.read(data_len)?;

        if reader.remaining() != 0 {
            return Err(unsupported(format!(
                "{} trailing bytes after message",
                reader.remaining()
            )));
        }

        let instruction = SolanaInstruction {
            program_id_index,
            account_indices,
            data,
        };
        let transfer = decode_system_transfer(account_keys, &header, &instruction)?;

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instruction,
            transfer,
            encoded: bytes,
        })
    }

    /// The message bytes that get signed.
    pub fn encoded(&self) -> &'a [u8] {
        self.encoded
    }

    pub fn account_count(&self) -> usize {
        self.account_keys.len() / PUBKEY_LEN
    }

    pub fn account(&self, index: u8) -> Option<&'a [u8; 32]> {
        account_at(self.account_keys, index).ok()
    }
}

fn account_at(account_keys: &[u8], index: u8) -> Result<&[u8; 32], SolError> {
    let start = usize::from(index) * PUBKEY_LEN;
    account_keys
        .get(start..start + PUBKEY_LEN)
        .and_then(|key| key.try_into().ok())
        .ok_or(SolError::InvalidAccountIndex {
            index,
            count: account_keys.len() / PUBKEY_LEN,
        })
}

/// Interprets the instruction as a System Program `Transfer`.
///
/// Accounts are resolved through the instruction's own index list: the
/// first entry funds the transfer and must be a signer, the second receives.
fn decode_system_transfer<'a>(
    account_keys: &'a [u8],
    header: &MessageHeader,
    instruction: &SolanaInstruction<'a>,
) -> Result<SystemTransfer<'a>, SolError> {
    if instruction.data.len() != TRANSFER_DATA_LEN {
        return Err(unsupported(format!(
            "system instruction data of {} bytes",
            instruction.data.len()
        )));
    }
    let mut data = BoundedReader::new(instruction.data);
    let discriminant = u32::from_le_bytes(data.read_array()?);
    if discriminant != SYSTEM_TRANSFER_IX_INDEX {
        return Err(unsupported(format!("system instruction {discriminant}")));
    }
    let lamports = data.read_u64_le()?;

    let &[funding_index, recipient_index] = instruction.account_indices else {
        return Err(unsupported(format!(
            "transfer with {} accounts",
            instruction.account_indices.len()
        )));
    };
    let funding_account = account_at(account_keys, funding_index)?;
    let recipient_account = account_at(account_keys, recipient_index)?;
    if funding_index >= header.num_required_signatures {
        return Err(unsupported("funding account is not a signer"));
    }

    Ok(SystemTransfer {
        funding_account,
        recipient_account,
        lamports,
    })
}
