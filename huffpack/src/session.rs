//! Coding sessions.
//!
//! A [`CodingSession`] owns everything derived from one source scan: the
//! frequency table, the merge tree, and the encoding table. The same
//! session must be used to encode and to decode; the compressed format
//! carries no code table, so a session rebuilt from different statistics
//! will decode garbage.

use crate::config::HuffmanConfig;
use crate::decode::TreeDecoder;
use crate::frequency::{FrequencyTable, Symbol};
use crate::packing::BitPacker;
use crate::table::{Code, EncodingTable};
use crate::tree::HuffmanTree;
use huffpack_core::error::{HuffpackError, Result};
use huffpack_core::io::{read_file, read_source, write_file, write_sink};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Size figures for one encode pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeStats {
    /// Source length in bytes.
    pub source_len: u64,
    /// Encoded payload length in bits.
    pub payload_bits: u64,
    /// Padding header length in bits.
    pub padding: u8,
    /// Packed output length in bytes.
    pub compressed_len: u64,
}

impl EncodeStats {
    /// Compressed size divided by source size.
    pub fn compression_ratio(&self) -> f64 {
        if self.source_len == 0 {
            1.0
        } else {
            self.compressed_len as f64 / self.source_len as f64
        }
    }

    /// Space savings as a percentage.
    pub fn space_savings(&self) -> f64 {
        if self.source_len == 0 {
            0.0
        } else {
            (1.0 - self.compression_ratio()) * 100.0
        }
    }

    /// Average code length in bits per source symbol.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.source_len == 0 {
            0.0
        } else {
            self.payload_bits as f64 / self.source_len as f64
        }
    }
}

/// Frequency table, tree, and code table for one source.
#[derive(Debug, Clone)]
pub struct CodingSession {
    /// Source statistics.
    frequencies: FrequencyTable,
    /// Merge tree; the sole authority for codes and decoding.
    tree: HuffmanTree,
    /// Code per symbol, derived from `tree`.
    table: EncodingTable,
}

impl CodingSession {
    /// Build a session from a source over the 7-bit ASCII alphabet.
    pub fn analyze(source: &[u8]) -> Result<Self> {
        Self::analyze_with(source, HuffmanConfig::ASCII)
    }

    /// Build a session from a source with the given configuration.
    pub fn analyze_with(source: &[u8], config: HuffmanConfig) -> Result<Self> {
        let frequencies = FrequencyTable::analyze_with(source, config)?;
        Self::from_frequencies(frequencies)
    }

    /// Build a session from precomputed statistics.
    pub fn from_frequencies(frequencies: FrequencyTable) -> Result<Self> {
        let tree = HuffmanTree::build(frequencies.records())?;
        let table = EncodingTable::from_tree(&tree, frequencies.config().alphabet_size as usize);
        Ok(Self {
            frequencies,
            tree,
            table,
        })
    }

    /// Build a session by reading a source stream to its end.
    pub fn from_reader<R: Read>(reader: R, config: HuffmanConfig) -> Result<Self> {
        let frequencies = FrequencyTable::from_reader(reader, config)?;
        Self::from_frequencies(frequencies)
    }

    /// Build a session from the contents of a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let source = read_file(path)?;
        Self::analyze(&source)
    }

    /// Code for `symbol`.
    fn code_for(&self, symbol: Symbol) -> Result<&Code> {
        self.table
            .get(symbol)
            .ok_or_else(|| HuffpackError::unmapped_symbol(symbol))
    }

    /// Encode a source into packed bytes.
    pub fn encode(&self, source: &[u8]) -> Result<Vec<u8>> {
        self.encode_with_stats(source).map(|(packed, _)| packed)
    }

    /// Encode a source and report its sizes.
    ///
    /// Every source symbol must have a code, which holds whenever the
    /// source is the one the session was built from.
    pub fn encode_with_stats(&self, source: &[u8]) -> Result<(Vec<u8>, EncodeStats)> {
        let mut payload_bits = 0u64;
        for &symbol in source {
            payload_bits += self.code_for(symbol)?.len() as u64;
        }

        let mut packer = BitPacker::new(payload_bits);
        let padding = packer.padding();
        for &symbol in source {
            packer.push_code(self.code_for(symbol)?);
        }
        let packed = packer.finish()?;

        let stats = EncodeStats {
            source_len: source.len() as u64,
            payload_bits,
            padding,
            compressed_len: packed.len() as u64,
        };
        debug!(
            source_len = stats.source_len,
            payload_bits,
            padding,
            compressed_len = stats.compressed_len,
            "encoded source"
        );
        Ok((packed, stats))
    }

    /// Encode a source and write the packed bytes to a sink.
    pub fn encode_to<W: Write>(&self, source: &[u8], writer: W) -> Result<EncodeStats> {
        let (packed, stats) = self.encode_with_stats(source)?;
        write_sink(writer, &packed)?;
        Ok(stats)
    }

    /// Encode a source stream and write the packed bytes to a sink.
    pub fn encode_stream<R: Read, W: Write>(&self, reader: R, writer: W) -> Result<EncodeStats> {
        let source = read_source(reader)?;
        self.encode_to(&source, writer)
    }

    /// Encode the file at `source` into the file at `destination`.
    pub fn encode_file(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
    ) -> Result<EncodeStats> {
        let data = read_file(source)?;
        let (packed, stats) = self.encode_with_stats(&data)?;
        write_file(destination, &packed)?;
        Ok(stats)
    }

    /// Decode packed bytes produced by this session.
    pub fn decode(&self, packed: &[u8]) -> Result<Vec<u8>> {
        TreeDecoder::new(&self.tree).decode(packed)
    }

    /// Decode packed bytes and write the symbols to a sink.
    pub fn decode_to<W: Write>(&self, packed: &[u8], writer: W) -> Result<usize> {
        TreeDecoder::new(&self.tree).decode_to(packed, writer)
    }

    /// Decode the file at `source` into the file at `destination`.
    pub fn decode_file(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
    ) -> Result<usize> {
        let packed = read_file(source)?;
        let decoded = self.decode(&packed)?;
        write_file(destination, &decoded)?;
        Ok(decoded.len())
    }

    /// Source statistics.
    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    /// Merge tree.
    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    /// Encoding table.
    pub fn table(&self) -> &EncodingTable {
        &self.table
    }

    /// Configuration the session was built with.
    pub fn config(&self) -> &HuffmanConfig {
        self.frequencies.config()
    }
}
