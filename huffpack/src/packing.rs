//! Padded bit packing.
//!
//! A payload of `L` bits is stored as whole bytes by prefixing a header of
//! `padding - 1` zero bits followed by a single `1` sentinel, where
//!
//! ```text
//! padding = 8 - (L mod 8)        (1..=8)
//! ```
//!
//! so the header is never empty: a payload that is already byte-aligned
//! still receives a full header byte (`0x01`). Bits are packed MSB-first.
//!
//! ```text
//! payload  "10110"          (L = 5, padding = 3)
//! packed   0 0 1 1 0 1 1 0  -> [0x36]
//!          └─┬─┘ └───┬───┘
//!          header  payload
//! ```
//!
//! The packed length is always exactly `L / 8 + 1` bytes. Unpacking finds
//! the sentinel in the first byte and returns a view over the remaining bits.

use crate::table::Code;
use huffpack_core::bitstream::{BitBuffer, BitReader, bit_at};
use huffpack_core::error::{HuffpackError, Result};

/// Header length in bits for a payload of `payload_len` bits.
#[inline]
pub fn padding_for(payload_len: u64) -> u8 {
    8 - (payload_len % 8) as u8
}

/// Packed size in bytes for a payload of `payload_len` bits.
#[inline]
pub fn packed_len(payload_len: u64) -> usize {
    (payload_len / 8 + 1) as usize
}

/// Incremental packer for a payload of known length.
///
/// The header is written up front, so codes go straight into the packed
/// buffer without an intermediate bit sequence.
#[derive(Debug)]
pub struct BitPacker {
    /// Header followed by the payload pushed so far.
    buffer: BitBuffer,
    /// Declared payload length in bits.
    payload_len: u64,
    /// Header length in bits.
    padding: u8,
}

impl BitPacker {
    /// Start packing a payload of `payload_len` bits.
    pub fn new(payload_len: u64) -> Self {
        let padding = padding_for(payload_len);
        let mut buffer = BitBuffer::with_capacity(payload_len + padding as u64);
        // padding - 1 zeros, then the sentinel
        buffer.push_bits(1, padding);
        Self {
            buffer,
            payload_len,
            padding,
        }
    }

    /// Header length in bits.
    pub fn padding(&self) -> u8 {
        self.padding
    }

    /// Append one payload bit.
    #[inline]
    pub fn push_bit(&mut self, bit: bool) {
        self.buffer.push_bit(bit);
    }

    /// Append a code to the payload.
    #[inline]
    pub fn push_code(&mut self, code: &Code) {
        code.write_to(&mut self.buffer);
    }

    /// Payload bits pushed so far.
    pub fn pushed(&self) -> u64 {
        self.buffer.len() - self.padding as u64
    }

    /// Finish packing and return the packed bytes.
    ///
    /// Fails if the pushed payload differs from the declared length.
    pub fn finish(self) -> Result<Vec<u8>> {
        let pushed = self.pushed();
        if pushed != self.payload_len {
            return Err(HuffpackError::payload_length_mismatch(
                self.payload_len,
                pushed,
            ));
        }
        debug_assert!(self.buffer.is_byte_aligned());
        Ok(self.buffer.into_bytes())
    }
}

/// Pack a bit sequence with its padding header.
pub fn pack(payload: &BitBuffer) -> Vec<u8> {
    let mut packer = BitPacker::new(payload.len());
    for bit in payload.reader() {
        packer.push_bit(bit);
    }
    packer.buffer.into_bytes()
}

/// Pack a string of `0`/`1` characters with its padding header.
///
/// Nothing is produced if any character is not a binary digit.
pub fn pack_bit_string(bits: &str) -> Result<Vec<u8>> {
    let payload = BitBuffer::from_bit_str(bits)?;
    Ok(pack(&payload))
}

/// Strip the padding header from packed bytes.
///
/// The sentinel must be in the first byte; empty input or a zero first
/// byte is rejected.
pub fn unpack(data: &[u8]) -> Result<PackedBits<'_>> {
    let first = *data
        .first()
        .ok_or_else(|| HuffpackError::header_not_found(None))?;
    if first == 0 {
        return Err(HuffpackError::header_not_found(Some(first)));
    }

    let padding = first.leading_zeros() as u8 + 1;
    Ok(PackedBits {
        data,
        padding,
        len: data.len() as u64 * 8 - padding as u64,
    })
}

/// Payload bits of a packed buffer, borrowed in place.
#[derive(Debug, Clone, Copy)]
pub struct PackedBits<'a> {
    /// Packed bytes including the header.
    data: &'a [u8],
    /// Header length in bits.
    padding: u8,
    /// Payload length in bits.
    len: u64,
}

impl<'a> PackedBits<'a> {
    /// Payload length in bits.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Header length in bits.
    pub fn padding(&self) -> u8 {
        self.padding
    }

    /// Payload bit at `index`.
    pub fn get(&self, index: u64) -> Option<bool> {
        (index < self.len).then(|| bit_at(self.data, self.padding as u64 + index))
    }

    /// Sequential reader over the payload.
    pub fn reader(&self) -> BitReader<'a> {
        BitReader::with_range(self.data, self.padding as u64, self.len)
    }

    /// Copy the payload into an owned bit buffer.
    pub fn to_bit_buffer(&self) -> BitBuffer {
        let mut buffer = BitBuffer::with_capacity(self.len);
        buffer.extend_from_reader(&mut self.reader());
        buffer
    }

    /// Render the payload as a string of `0` and `1` characters.
    pub fn to_bit_string(&self) -> String {
        self.reader().map(|b| if b { '1' } else { '0' }).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_rule() {
        assert_eq!(padding_for(0), 8);
        assert_eq!(padding_for(1), 7);
        assert_eq!(padding_for(7), 1);
        assert_eq!(padding_for(8), 8);
        assert_eq!(padding_for(13), 3);
    }

    #[test]
    fn test_pack_layout() {
        let packed = pack_bit_string("10110").unwrap();
        assert_eq!(packed, vec![0b0011_0110]);

        // One free bit: the sentinel alone
        let packed = pack_bit_string("0000000").unwrap();
        assert_eq!(packed, vec![0b1000_0000]);
    }

    #[test]
    fn test_aligned_payload_gets_full_header() {
        let packed = pack_bit_string("11110000").unwrap();
        assert_eq!(packed, vec![0x01, 0xF0]);

        let unpacked = unpack(&packed).unwrap();
        assert_eq!(unpacked.padding(), 8);
        assert_eq!(unpacked.to_bit_string(), "11110000");
    }

    #[test]
    fn test_empty_payload() {
        let packed = pack(&BitBuffer::new());
        assert_eq!(packed, vec![0x01]);
        assert!(unpack(&packed).unwrap().is_empty());
    }

    #[test]
    fn test_packed_len_has_no_trailing_byte() {
        for len in 0..64u64 {
            let bits: String = (0..len).map(|i| if i % 3 == 0 { '1' } else { '0' }).collect();
            let packed = pack_bit_string(&bits).unwrap();
            assert_eq!(packed.len(), packed_len(len), "payload of {len} bits");
            assert_eq!(packed.len() * 8, (len + padding_for(len) as u64) as usize);
        }
    }

    #[test]
    fn test_unpack_roundtrip_every_remainder() {
        let pattern = "1101001110001011";
        for len in 0..=pattern.len() {
            let bits = &pattern[..len];
            let packed = pack_bit_string(bits).unwrap();
            let unpacked = unpack(&packed).unwrap();
            assert_eq!(unpacked.len(), len as u64);
            assert_eq!(unpacked.to_bit_string(), bits);
        }
    }

    #[test]
    fn test_invalid_bit_character() {
        let err = pack_bit_string("0102").unwrap_err();
        assert!(matches!(
            err,
            HuffpackError::InvalidBitCharacter {
                position: 3,
                found: '2'
            }
        ));
    }

    #[test]
    fn test_header_not_found() {
        assert!(matches!(
            unpack(&[0x00, 0xFF]),
            Err(HuffpackError::HeaderNotFound {
                first_byte: Some(0)
            })
        ));
        assert!(matches!(
            unpack(&[]),
            Err(HuffpackError::HeaderNotFound { first_byte: None })
        ));
    }

    #[test]
    fn test_packer_length_check() {
        let mut packer = BitPacker::new(3);
        packer.push_code(&Code::new(0b10, 2));
        assert!(matches!(
            packer.finish(),
            Err(HuffpackError::PayloadLengthMismatch {
                expected: 3,
                actual: 2
            })
        ));

        let mut packer = BitPacker::new(3);
        packer.push_code(&Code::new(0b10, 2));
        packer.push_bit(true);
        assert_eq!(packer.finish().unwrap(), vec![0b0000_1101]);
    }

    #[test]
    fn test_random_access() {
        let packed = pack_bit_string("0110").unwrap();
        let unpacked = unpack(&packed).unwrap();
        assert_eq!(unpacked.get(0), Some(false));
        assert_eq!(unpacked.get(1), Some(true));
        assert_eq!(unpacked.get(4), None);
        assert_eq!(unpacked.to_bit_buffer().to_bit_string(), "0110");
    }
}
