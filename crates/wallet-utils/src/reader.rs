//! Bounds-checked field extraction over untrusted buffers.
//!
//! Every wire decoder in the workspace pulls its fields through a
//! [`BoundedReader`]. A read that would cross the declared end of the buffer
//! fails and poisons the reader: all later reads fail too, so a decoder
//! cannot accidentally keep going and hand back a half-populated structure.

use crate::error::ReadError;

/// A cursor over a caller-owned buffer of fixed declared size.
///
/// Slices returned by [`read`](Self::read) borrow from the original buffer
/// for `'a`, so parsed views can outlive the reader but never the buffer.
#[derive(Debug, Clone)]
pub struct BoundedReader<'a> {
    buf: &'a [u8],
    /// `None` once poisoned.
    offset: Option<usize>,
}

impl<'a> BoundedReader<'a> {
    /// Reader over the whole of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            offset: Some(0),
        }
    }

    /// Reader over the first `size` bytes of `buf`.
    ///
    /// Fails if the caller declares more bytes than the buffer holds.
    pub fn with_declared_size(buf: &'a [u8], size: usize) -> Result<Self, ReadError> {
        let bounded = buf.get(..size).ok_or(ReadError::DeclaredSizeTooLarge {
            declared: size,
            actual: buf.len(),
        })?;
        Ok(Self::new(bounded))
    }

    /// Current offset, or `None` if the reader is poisoned.
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    pub fn is_poisoned(&self) -> bool {
        self.offset.is_none()
    }

    /// Bytes left before the declared end; zero once poisoned.
    pub fn remaining(&self) -> usize {
        self.offset.map_or(0, |offset| self.buf.len() - offset)
    }

    fn poison(&mut self, err: ReadError) -> ReadError {
        self.offset = None;
        err
    }

    /// Returns the next `len` bytes and advances past them.
    pub fn read(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        let offset = self.offset.ok_or(ReadError::Poisoned)?;
        match offset.checked_add(len) {
            Some(end) if end <= self.buf.len() => {
                self.offset = Some(end);
                Ok(&self.buf[offset..end])
            }
            _ => Err(self.poison(ReadError::OutOfBounds {
                offset,
                len,
                size: self.buf.len(),
            })),
        }
    }

    pub fn skip(&mut self, len: usize) -> Result<(), ReadError> {
        self.read(len).map(|_| ())
    }

    /// Copies the next `N` bytes into an owned array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        Ok(*self.read_array_ref::<N>()?)
    }

    /// Borrows the next `N` bytes as a fixed-size array view.
    pub fn read_array_ref<const N: usize>(&mut self) -> Result<&'a [u8; N], ReadError> {
        let bytes = self.read(N)?;
        <&[u8; N]>::try_from(bytes).map_err(|_| ReadError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        })
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16, ReadError> {
        self.read_array().map(u16::from_be_bytes)
    }

    pub fn read_u32_be(&mut self) -> Result<u32, ReadError> {
        self.read_array().map(u32::from_be_bytes)
    }

    pub fn read_u64_be(&mut self) -> Result<u64, ReadError> {
        self.read_array().map(u64::from_be_bytes)
    }

    pub fn read_u64_le(&mut self) -> Result<u64, ReadError> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Reads a NUL-terminated string.
    ///
    /// Consumes the run up to and including the first NUL in the remaining
    /// bytes and returns it without the terminator. A missing terminator
    /// poisons the reader.
    pub fn read_cstr(&mut self) -> Result<&'a [u8], ReadError> {
        let offset = self.offset.ok_or(ReadError::Poisoned)?;
        match self.buf[offset..].iter().position(|&b| b == 0) {
            Some(nul) => {
                let run = self.read(nul + 1)?;
                Ok(&run[..nul])
            }
            None => Err(self.poison(ReadError::MissingTerminator)),
        }
    }

    /// Reads a Solana compact-u16 length.
    ///
    /// Little-endian base-128, at most three bytes. Values above `u16::MAX`,
    /// a continuation bit on the third byte and zero-padded encodings are
    /// rejected and poison the reader.
    pub fn read_compact_u16(&mut self) -> Result<u16, ReadError> {
        let mut value: u32 = 0;
        for i in 0..3 {
            let byte = self.read_u8()?;
            if i > 0 && byte == 0 {
                return Err(self.poison(ReadError::MalformedCompactLength));
            }
            value |= u32::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return match u16::try_from(value) {
                    Ok(len) => Ok(len),
                    Err(_) => Err(self.poison(ReadError::MalformedCompactLength)),
                };
            }
        }
        Err(self.poison(ReadError::MalformedCompactLength))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn reads_advance_offset() {
        let buf = hex!("01020304 0506");
        let mut reader = BoundedReader::new(&buf);
        assert_eq!(reader.read(2).unwrap(), &[0x01, 0x02]);
        assert_eq!(reader.offset(), Some(2));
        assert_eq!(reader.read_u32_be().unwrap(), 0x0304_0506);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn read_to_exact_end_succeeds() {
        let buf = [0xaa; 8];
        let mut reader = BoundedReader::new(&buf);
        assert_eq!(reader.read(8).unwrap().len(), 8);
        assert_eq!(reader.read(0).unwrap().len(), 0);
        assert!(!reader.is_poisoned());
    }

    #[test]
    fn overflow_poisons_permanently() {
        let buf = [0u8; 4];
        let mut reader = BoundedReader::new(&buf);
        reader.read(3).unwrap();
        assert_eq!(
            reader.read(2),
            Err(ReadError::OutOfBounds {
                offset: 3,
                len: 2,
                size: 4
            })
        );
        assert!(reader.is_poisoned());
        assert_eq!(reader.offset(), None);
        assert_eq!(reader.remaining(), 0);
        // Even a read that would have fitted now fails.
        assert_eq!(reader.read(0), Err(ReadError::Poisoned));
        assert_eq!(reader.read_u8(), Err(ReadError::Poisoned));
    }

    #[test]
    fn huge_length_does_not_wrap() {
        let buf = [0u8; 4];
        let mut reader = BoundedReader::new(&buf);
        reader.read(1).unwrap();
        assert!(reader.read(usize::MAX).is_err());
        assert!(reader.is_poisoned());
    }

    #[test]
    fn declared_size_limits_reads() {
        let buf = [0u8; 16];
        let mut reader = BoundedReader::with_declared_size(&buf, 4).unwrap();
        assert!(reader.read(5).is_err());
    }

    #[test]
    fn declared_size_larger_than_buffer_is_rejected() {
        let buf = [0u8; 4];
        assert_eq!(
            BoundedReader::with_declared_size(&buf, 5).unwrap_err(),
            ReadError::DeclaredSizeTooLarge {
                declared: 5,
                actual: 4
            }
        );
    }

    #[test]
    fn integer_helpers_use_expected_byte_order() {
        let buf = hex!("abcd 0102030405060708 00e1f50500000000");
        let mut reader = BoundedReader::new(&buf);
        assert_eq!(reader.read_u16_be().unwrap(), 0xabcd);
        assert_eq!(reader.read_u64_be().unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(reader.read_u64_le().unwrap(), 100_000_000);
    }

    #[test]
    fn array_ref_borrows_from_buffer() {
        let buf = [7u8; 32];
        let view = {
            let mut reader = BoundedReader::new(&buf);
            reader.read_array_ref::<32>().unwrap()
        };
        assert!(std::ptr::eq(view.as_ptr(), buf.as_ptr()));
    }

    #[test]
    fn cstr_consumes_terminator() {
        let buf = *b"ETH\0rest";
        let mut reader = BoundedReader::new(&buf);
        assert_eq!(reader.read_cstr().unwrap(), b"ETH");
        assert_eq!(reader.offset(), Some(4));
        assert_eq!(reader.read(4).unwrap(), b"rest");
    }

    #[test]
    fn empty_cstr() {
        let buf = [0u8, 1];
        let mut reader = BoundedReader::new(&buf);
        assert_eq!(reader.read_cstr().unwrap(), b"");
        assert_eq!(reader.offset(), Some(1));
    }

    #[test]
    fn cstr_without_terminator_poisons() {
        let buf = *b"USDT";
        let mut reader = BoundedReader::new(&buf);
        assert_eq!(reader.read_cstr(), Err(ReadError::MissingTerminator));
        assert!(reader.is_poisoned());
    }

    #[test]
    fn cstr_terminator_beyond_declared_size_is_missing() {
        let buf = *b"USDT\0";
        let mut reader = BoundedReader::with_declared_size(&buf, 4).unwrap();
        assert_eq!(reader.read_cstr(), Err(ReadError::MissingTerminator));
    }

    #[test]
    fn compact_u16_values() {
        let cases: &[(&[u8], u16)] = &[
            (&[0x00], 0),
            (&[0x02], 2),
            (&[0x7f], 0x7f),
            (&[0x80, 0x01], 0x80),
            (&[0xff, 0x7f], 0x3fff),
            (&[0x80, 0x80, 0x01], 0x4000),
            (&[0xff, 0xff, 0x03], 0xffff),
        ];
        for (bytes, expected) in cases {
            let mut reader = BoundedReader::new(bytes);
            assert_eq!(reader.read_compact_u16().unwrap(), *expected, "{bytes:02x?}");
            assert_eq!(reader.remaining(), 0);
        }
    }

    #[test]
    fn compact_u16_rejects_fourth_byte() {
        let buf = [0x80, 0x80, 0x80, 0x01];
        let mut reader = BoundedReader::new(&buf);
        assert_eq!(
            reader.read_compact_u16(),
            Err(ReadError::MalformedCompactLength)
        );
        assert!(reader.is_poisoned());
    }

    #[test]
    fn compact_u16_rejects_overflow() {
        let buf = [0xff, 0xff, 0x04];
        let mut reader = BoundedReader::new(&buf);
        assert_eq!(
            reader.read_compact_u16(),
            Err(ReadError::MalformedCompactLength)
        );
    }

    #[test]
    fn compact_u16_rejects_zero_padding() {
        let buf = [0x80, 0x00];
        let mut reader = BoundedReader::new(&buf);
        assert_eq!(
            reader.read_compact_u16(),
            Err(ReadError::MalformedCompactLength)
        );
    }

    #[test]
    fn compact_u16_truncated() {
        let buf = [0x80];
        let mut reader = BoundedReader::new(&buf);
        assert!(matches!(
            reader.read_compact_u16(),
            Err(ReadError::OutOfBounds { .. })
        ));
    }
}
