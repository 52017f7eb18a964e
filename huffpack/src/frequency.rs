//! Symbol frequency analysis.
//!
//! A source is scanned once to count every symbol. Counts are normalized
//! to probabilities and sorted ascending; equal probabilities keep ascending
//! symbol order because the alphabet is scanned in order and the sort is
//! stable. A source with a single distinct symbol gets a synthetic second
//! record of probability zero so that every tree has at least two leaves.

use crate::config::HuffmanConfig;
use huffpack_core::error::{HuffpackError, Result};
use huffpack_core::io::read_source;
use std::io::Read;
use tracing::{debug, trace};

/// A symbol of the coding alphabet.
pub type Symbol = u8;

/// Probability payload of a tree node.
///
/// `symbol` is `None` for internal nodes produced by merging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyRecord {
    /// Symbol for leaf records.
    pub symbol: Option<Symbol>,
    /// Probability of occurrence in `[0, 1]`.
    pub probability: f64,
}

impl FrequencyRecord {
    /// Create a leaf record.
    pub fn leaf(symbol: Symbol, probability: f64) -> Self {
        Self {
            symbol: Some(symbol),
            probability,
        }
    }

    /// Create an internal record for a merged node.
    pub fn internal(probability: f64) -> Self {
        Self {
            symbol: None,
            probability,
        }
    }

    /// Whether this record names a symbol.
    pub fn is_leaf(&self) -> bool {
        self.symbol.is_some()
    }
}

/// Symbol statistics for one source.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    /// Alphabet and tolerance settings.
    config: HuffmanConfig,
    /// Occurrence count per symbol.
    counts: Vec<u64>,
    /// Total symbols scanned.
    total: u64,
    /// Leaf records sorted by ascending probability.
    records: Vec<FrequencyRecord>,
    /// Symbol injected by the single-symbol fix-up.
    synthetic: Option<Symbol>,
}

impl FrequencyTable {
    /// Analyze a source over the 7-bit ASCII alphabet.
    pub fn analyze(source: &[u8]) -> Result<Self> {
        Self::analyze_with(source, HuffmanConfig::ASCII)
    }

    /// Analyze a source with the given configuration.
    pub fn analyze_with(source: &[u8], config: HuffmanConfig) -> Result<Self> {
        config.validate()?;

        let mut counts = vec![0u64; config.alphabet_size as usize];
        let mut total = 0u64;

        for (offset, &byte) in source.iter().enumerate() {
            let slot = counts.get_mut(byte as usize).ok_or_else(|| {
                HuffpackError::symbol_out_of_range(offset as u64, byte, config.alphabet_size)
            })?;
            *slot += 1;
            total += 1;
        }

        if total == 0 {
            return Err(HuffpackError::EmptySource);
        }

        let mut records: Vec<FrequencyRecord> = counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| {
                FrequencyRecord::leaf(symbol as Symbol, count as f64 / total as f64)
            })
            .collect();

        let mut synthetic = None;
        if let [only] = records.as_slice() {
            if let Some(observed) = only.symbol {
                let symbol = config.next_symbol(observed);
                trace!(observed, synthetic = symbol, "single-symbol source, adding synthetic leaf");
                records.push(FrequencyRecord::leaf(symbol, 0.0));
                synthetic = Some(symbol);
            }
        }

        // Stable: equal probabilities stay in symbol order
        records.sort_by(|a, b| a.probability.total_cmp(&b.probability));

        debug!(
            total,
            distinct = records.len() - synthetic.is_some() as usize,
            "analyzed source frequencies"
        );

        Ok(Self {
            config,
            counts,
            total,
            records,
            synthetic,
        })
    }

    /// Read a source stream to its end and analyze it.
    pub fn from_reader<R: Read>(reader: R, config: HuffmanConfig) -> Result<Self> {
        let source = read_source(reader)?;
        Self::analyze_with(&source, config)
    }

    /// Leaf records sorted by ascending probability.
    pub fn records(&self) -> &[FrequencyRecord] {
        &self.records
    }

    /// Occurrence count of `symbol` in the source.
    pub fn count(&self, symbol: Symbol) -> u64 {
        self.counts.get(symbol as usize).copied().unwrap_or(0)
    }

    /// Occurrence counts indexed by symbol.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total number of symbols scanned.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct symbols that occur in the source.
    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// The synthetic symbol added for single-symbol sources.
    pub fn synthetic(&self) -> Option<Symbol> {
        self.synthetic
    }

    /// Sum of probabilities over symbols that occur in the source.
    pub fn probability_sum(&self) -> f64 {
        self.records
            .iter()
            .filter(|r| r.symbol != self.synthetic)
            .map(|r| r.probability)
            .sum()
    }

    /// Whether the probability sum is within tolerance of 1.0.
    pub fn is_normalized(&self) -> bool {
        (self.probability_sum() - 1.0).abs() <= self.config.probability_tolerance
    }

    /// Configuration used for the analysis.
    pub fn config(&self) -> &HuffmanConfig {
        &self.config
    }
}
