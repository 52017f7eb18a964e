//! Tree-walk decoding.
//!
//! The decoder keeps a single cursor into the tree. Internal nodes consume
//! one bit and step to a child; reaching a leaf emits its symbol and resets
//! the cursor to the root without consuming a bit. When the input runs out
//! on a leaf, that final symbol is flushed.
//!
//! Decoding with a tree other than the one used to encode is not detected;
//! the output is simply wrong.

use crate::frequency::Symbol;
use crate::packing::unpack;
use crate::tree::{HuffmanTree, NodeId};
use huffpack_core::bitstream::BitReader;
use huffpack_core::error::Result;
use huffpack_core::io::write_sink;
use std::io::Write;
use tracing::debug;

/// Decoder over a borrowed tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeDecoder<'t> {
    /// Tree used for encoding.
    tree: &'t HuffmanTree,
}

impl<'t> TreeDecoder<'t> {
    /// Create a decoder for `tree`.
    pub fn new(tree: &'t HuffmanTree) -> Self {
        Self { tree }
    }

    /// Decode a payload bit sequence, appending symbols to `output`.
    pub fn decode_bits(&self, mut bits: BitReader<'_>, output: &mut Vec<Symbol>) {
        let root = self.tree.root();
        let mut ptr: NodeId = root;

        loop {
            let node = self.tree.node(ptr);
            match node.children {
                Some((left, right)) => match bits.read_bit() {
                    Some(bit) => ptr = if bit { right } else { left },
                    None => break,
                },
                None => {
                    output.extend(node.symbol());
                    ptr = root;
                    // The leaf was reached on the last bit
                    if bits.is_exhausted() {
                        break;
                    }
                }
            }
        }

        if ptr != root {
            debug!(
                bits_read = bits.bits_read(),
                "payload ended inside a code, trailing bits dropped"
            );
        }
    }

    /// Decode packed bytes (header included).
    pub fn decode(&self, packed: &[u8]) -> Result<Vec<u8>> {
        let payload = unpack(packed)?;
        let mut output = Vec::with_capacity(payload.len() as usize / 2);
        self.decode_bits(payload.reader(), &mut output);
        Ok(output)
    }

    /// Decode packed bytes and write the symbols to a sink.
    pub fn decode_to<W: Write>(&self, packed: &[u8], writer: W) -> Result<usize> {
        let output = self.decode(packed)?;
        write_sink(writer, &output)?;
        Ok(output.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::packing::pack_bit_string;

    fn tree_for(source: &[u8]) -> HuffmanTree {
        let frequencies = FrequencyTable::analyze(source).unwrap();
        HuffmanTree::build(frequencies.records()).unwrap()
    }

    #[test]
    fn test_decode_two_symbols() {
        // b -> 0, a -> 1
        let tree = tree_for(b"aaab");
        let packed = pack_bit_string("1110").unwrap();
        let decoded = TreeDecoder::new(&tree).decode(&packed).unwrap();
        assert_eq!(decoded, b"aaab");
    }

    #[test]
    fn test_decode_flushes_last_symbol() {
        // a=00 b=01 c=10 d=11
        let tree = tree_for(b"abcd");
        let packed = pack_bit_string("11100100").unwrap();
        let decoded = TreeDecoder::new(&tree).decode(&packed).unwrap();
        assert_eq!(decoded, b"dcba");
    }

    #[test]
    fn test_decode_drops_partial_code() {
        let tree = tree_for(b"abcd");
        let packed = pack_bit_string("001").unwrap();
        let decoded = TreeDecoder::new(&tree).decode(&packed).unwrap();
        assert_eq!(decoded, b"a");
    }

    #[test]
    fn test_decode_empty_payload() {
        let tree = tree_for(b"abcd");
        let decoded = TreeDecoder::new(&tree).decode(&[0x01]).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_to_sink() {
        let tree = tree_for(b"aaab");
        let packed = pack_bit_string("0101").unwrap();
        let mut sink = Vec::new();
        let written = TreeDecoder::new(&tree).decode_to(&packed, &mut sink).unwrap();
        assert_eq!(written, 4);
        assert_eq!(sink, b"baba");
    }

    #[test]
    fn test_decode_rejects_missing_header() {
        let tree = tree_for(b"aaab");
        assert!(TreeDecoder::new(&tree).decode(&[0x00]).is_err());
    }
}
