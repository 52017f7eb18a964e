//! Encoding table derivation.
//!
//! Every root-to-leaf path of the tree becomes the code of that leaf's
//! symbol: a left edge appends `0`, a right edge appends `1`.

use crate::frequency::{FrequencyTable, Symbol};
use crate::tree::HuffmanTree;
use huffpack_core::bitstream::BitBuffer;
use std::fmt;

/// Maximum code length in bits.
///
/// A tree over 128 symbols is at most 127 levels deep.
pub const MAX_CODE_LENGTH: u8 = 128;

/// A prefix code, stored MSB-first in the low `len` bits of `bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    /// Code bits; the first bit of the code is the most significant.
    bits: u128,
    /// Number of bits.
    len: u8,
}

impl Code {
    /// The empty code.
    pub const EMPTY: Code = Code { bits: 0, len: 0 };

    /// Create a code from its bits and length.
    pub fn new(bits: u128, len: u8) -> Self {
        debug_assert!(len <= MAX_CODE_LENGTH);
        let mask = if len >= MAX_CODE_LENGTH {
            u128::MAX
        } else {
            (1u128 << len) - 1
        };
        Self {
            bits: bits & mask,
            len,
        }
    }

    /// This code followed by one more bit.
    pub fn child(self, bit: bool) -> Self {
        Self::new((self.bits << 1) | bit as u128, self.len + 1)
    }

    /// Code bits.
    pub fn bits(&self) -> u128 {
        self.bits
    }

    /// Code length in bits.
    pub fn len(&self) -> u8 {
        self.len
    }

    /// Whether the code has no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether this code is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.len == 0 {
            return true;
        }
        self.len <= other.len && (other.bits >> (other.len - self.len)) == self.bits
    }

    /// Append this code to a bit buffer.
    #[inline]
    pub fn write_to(&self, buffer: &mut BitBuffer) {
        buffer.push_bits(self.bits, self.len);
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.len).rev() {
            let c = if (self.bits >> i) & 1 == 1 { '1' } else { '0' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Symbol-indexed code lookup table.
#[derive(Debug, Clone)]
pub struct EncodingTable {
    /// One slot per alphabet symbol.
    codes: Vec<Option<Code>>,
}

impl EncodingTable {
    /// Derive the code of every leaf in `tree`.
    ///
    /// `alphabet_size` must cover every leaf symbol.
    pub fn from_tree(tree: &HuffmanTree, alphabet_size: usize) -> Self {
        let mut codes = vec![None; alphabet_size];
        let mut stack = vec![(tree.root(), Code::EMPTY)];

        while let Some((id, code)) = stack.pop() {
            let node = tree.node(id);
            match node.children {
                Some((left, right)) => {
                    stack.push((right, code.child(true)));
                    stack.push((left, code.child(false)));
                }
                None => {
                    let Some(symbol) = node.symbol() else {
                        continue;
                    };
                    let slot = codes.get_mut(symbol as usize);
                    debug_assert!(
                        slot.is_some(),
                        "leaf symbol {symbol} outside an alphabet of {alphabet_size}"
                    );
                    if let Some(slot) = slot {
                        *slot = Some(code);
                    }
                }
            }
        }

        Self { codes }
    }

    /// Code assigned to `symbol`.
    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(symbol as usize).and_then(Option::as_ref)
    }

    /// Assigned `(symbol, code)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|c| (symbol as Symbol, c)))
    }

    /// Number of assigned codes.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    /// Whether no code is assigned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots (the alphabet size).
    pub fn capacity(&self) -> usize {
        self.codes.len()
    }

    /// Payload length in bits for the source `frequencies` was computed from.
    pub fn encoded_bit_length(&self, frequencies: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(symbol, code)| frequencies.count(symbol) * code.len() as u64)
            .sum()
    }

    /// Codes rendered as `0`/`1` strings, indexed by symbol.
    pub fn to_bit_strings(&self) -> Vec<Option<String>> {
        self.codes
            .iter()
            .map(|code| code.as_ref().map(Code::to_string))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_for(source: &[u8]) -> (FrequencyTable, EncodingTable) {
        let frequencies = FrequencyTable::analyze(source).unwrap();
        let tree = HuffmanTree::build(frequencies.records()).unwrap();
        let table = EncodingTable::from_tree(&tree, 128);
        (frequencies, table)
    }

    #[test]
    fn test_code_display() {
        let code = Code::EMPTY.child(true).child(false).child(true);
        assert_eq!(code.to_string(), "101");
        assert_eq!(code.len(), 3);
        assert_eq!(Code::new(0b11, 2).to_string(), "11");
        assert_eq!(Code::new(0b111, 2).to_string(), "11");
    }

    #[test]
    fn test_prefix_relation() {
        let short = Code::new(0b10, 2);
        assert!(short.is_prefix_of(&Code::new(0b101, 3)));
        assert!(short.is_prefix_of(&short));
        assert!(!short.is_prefix_of(&Code::new(0b110, 3)));
        assert!(!Code::new(0b101, 3).is_prefix_of(&short));
    }

    #[test]
    fn test_two_symbol_codes() {
        let (_, table) = table_for(b"aaab");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(b'b').unwrap().to_string(), "0");
        assert_eq!(table.get(b'a').unwrap().to_string(), "1");
        assert!(table.get(b'c').is_none());
    }

    #[test]
    fn test_prefix_free() {
        let (_, table) = table_for(b"she sells sea shells by the sea shore");
        let codes: Vec<Code> = table.iter().map(|(_, c)| *c).collect();
        for (i, a) in codes.iter().enumerate() {
            assert!(!a.is_empty());
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!a.is_prefix_of(b), "{a} is a prefix of {b}");
                }
            }
        }
    }

    #[test]
    fn test_encoded_bit_length() {
        let (frequencies, table) = table_for(b"aaab");
        assert_eq!(table.encoded_bit_length(&frequencies), 4);

        let (frequencies, table) = table_for(b"abcd");
        assert_eq!(table.encoded_bit_length(&frequencies), 8);
    }

    #[test]
    fn test_synthetic_symbol_gets_a_code() {
        let (frequencies, table) = table_for(b"zzzz");
        assert_eq!(table.len(), 2);
        assert!(table.get(b'{').is_some());
        assert_eq!(table.get(b'z').unwrap().len(), 1);
        assert_eq!(table.encoded_bit_length(&frequencies), 4);
    }

    #[test]
    fn test_bit_strings() {
        let (_, table) = table_for(b"aaab");
        let strings = table.to_bit_strings();
        assert_eq!(strings.len(), 128);
        assert_eq!(strings[b'a' as usize].as_deref(), Some("1"));
        assert_eq!(strings[0], None);
    }

    #[test]
    fn test_code_bits() {
        let code = Code::EMPTY.child(true).child(true).child(false);
        assert_eq!(code.bits(), 0b110);
        assert_eq!(Code::new(0b1111, 2).bits(), 0b11);

        let (_, table) = table_for(b"aaab");
        assert_eq!(table.get(b'a').unwrap().bits(), 1);
        assert_eq!(table.get(b'b').unwrap().bits(), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside an alphabet of 4")]
    fn test_leaf_outside_alphabet() {
        let frequencies = FrequencyTable::analyze(b"aaab").unwrap();
        let tree = HuffmanTree::build(frequencies.records()).unwrap();
        EncodingTable::from_tree(&tree, 4);
    }

    #[test]
    fn test_write_to_buffer() {
        let mut buffer = BitBuffer::new();
        Code::new(0b011, 3).write_to(&mut buffer);
        Code::new(0b1, 1).write_to(&mut buffer);
        assert_eq!(buffer.to_bit_string(), "0111");
    }
}
