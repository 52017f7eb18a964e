//! MSB-first bit buffers for prefix-code payloads.
//!
//! Huffman codes are written most-significant-bit first: the first bit of
//! every 8-bit group lands in bit `1 << 7` of its byte. This matches the
//! padded file format produced by the packer, which is read back the same way.
//!
//! # Example
//!
//! ```
//! use huffpack_core::bitstream::{BitBuffer, BitReader};
//!
//! let mut buffer = BitBuffer::new();
//! buffer.push_bits(0b101, 3);
//! buffer.push_bits(0b11001, 5);
//! assert_eq!(buffer.as_bytes(), &[0b1011_1001]);
//!
//! let mut reader = BitReader::new(buffer.as_bytes());
//! assert_eq!(reader.read_bit(), Some(true));
//! assert_eq!(reader.read_bit(), Some(false));
//! ```

use crate::error::{HuffpackError, Result};

/// Read the bit at `index` (MSB-first) from a byte slice.
#[inline]
pub fn bit_at(data: &[u8], index: u64) -> bool {
    let byte = data[(index / 8) as usize];
    (byte >> (7 - (index % 8) as u32)) & 1 == 1
}

/// A growable MSB-first bit buffer.
///
/// Bits are appended in amortized constant time. Unused low bits of the
/// final byte are always zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    /// Packed bytes.
    bytes: Vec<u8>,
    /// Number of valid bits.
    len: u64,
}

impl BitBuffer {
    /// Create an empty bit buffer.
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            len: 0,
        }
    }

    /// Create an empty bit buffer with room for `bits` bits.
    pub fn with_capacity(bits: u64) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8) as usize),
            len: 0,
        }
    }

    /// Parse a string of `0` and `1` characters.
    pub fn from_bit_str(bits: &str) -> Result<Self> {
        let mut buffer = Self::with_capacity(bits.len() as u64);
        for (position, c) in bits.chars().enumerate() {
            match c {
                '0' => buffer.push_bit(false),
                '1' => buffer.push_bit(true),
                other => return Err(HuffpackError::invalid_bit_character(position, other)),
            }
        }
        Ok(buffer)
    }

    /// Number of bits in the buffer.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the buffer holds no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the bit count is a multiple of 8.
    pub fn is_byte_aligned(&self) -> bool {
        self.len % 8 == 0
    }

    /// Append a single bit.
    #[inline]
    pub fn push_bit(&mut self, bit: bool) {
        let offset = (self.len % 8) as u32;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 1 << (7 - offset);
            }
        }
        self.len += 1;
    }

    /// Append the low `count` bits of `value`, most significant first.
    ///
    /// `count` may be at most 128.
    pub fn push_bits(&mut self, value: u128, count: u8) {
        debug_assert!(count <= 128, "Cannot push more than 128 bits at once");

        let mut remaining = count as u32;
        while remaining > 0 {
            let offset = (self.len % 8) as u32;
            if offset == 0 {
                self.bytes.push(0);
            }
            let free = 8 - offset;
            let take = free.min(remaining);

            // Next `take` bits from the high end of what is left
            let chunk = ((value >> (remaining - take)) & ((1u128 << take) - 1)) as u8;
            if let Some(last) = self.bytes.last_mut() {
                *last |= chunk << (free - take);
            }

            self.len += take as u64;
            remaining -= take;
        }
    }

    /// Append every bit read from `reader`.
    pub fn extend_from_reader(&mut self, reader: &mut BitReader<'_>) {
        while let Some(bit) = reader.read_bit() {
            self.push_bit(bit);
        }
    }

    /// Get the bit at `index`, or `None` past the end.
    pub fn get(&self, index: u64) -> Option<bool> {
        (index < self.len).then(|| bit_at(&self.bytes, index))
    }

    /// Packed bytes. The last byte is zero-filled past the final bit.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the buffer and return its packed bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Create a reader over the buffered bits.
    pub fn reader(&self) -> BitReader<'_> {
        BitReader::with_range(&self.bytes, 0, self.len)
    }

    /// Render the bits as a string of `0` and `1` characters.
    pub fn to_bit_string(&self) -> String {
        self.reader().map(|b| if b { '1' } else { '0' }).collect()
    }
}

/// A sequential MSB-first reader over a range of bits in a byte slice.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Input data.
    data: &'a [u8],
    /// Absolute index of the next bit.
    position: u64,
    /// Absolute index one past the last readable bit.
    end: u64,
    /// Absolute index of the first readable bit.
    start: u64,
}

impl<'a> BitReader<'a> {
    /// Create a reader over every bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_range(data, 0, data.len() as u64 * 8)
    }

    /// Create a reader over `len` bits of `data` starting at bit `start`.
    ///
    /// The range is clamped to the bits actually present.
    pub fn with_range(data: &'a [u8], start: u64, len: u64) -> Self {
        let total = data.len() as u64 * 8;
        let start = start.min(total);
        let end = start.saturating_add(len).min(total);
        Self {
            data,
            position: start,
            end,
            start,
        }
    }

    /// Read the next bit, or `None` once the range is exhausted.
    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        if self.position >= self.end {
            return None;
        }
        let bit = bit_at(self.data, self.position);
        self.position += 1;
        Some(bit)
    }

    /// Look at the next bit without consuming it.
    #[inline]
    pub fn peek_bit(&self) -> Option<bool> {
        (self.position < self.end).then(|| bit_at(self.data, self.position))
    }

    /// Bits consumed so far.
    pub fn bits_read(&self) -> u64 {
        self.position - self.start
    }

    /// Bits left to read.
    pub fn remaining(&self) -> u64 {
        self.end - self.position
    }

    /// Whether every bit has been read.
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.end
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.read_bit()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitReader<'_> {}
