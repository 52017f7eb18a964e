//! Coding session configuration.

use huffpack_core::error::{HuffpackError, Result};

/// Largest alphabet a session can code over (7-bit symbols).
pub const MAX_ALPHABET_SIZE: u16 = 128;

/// Configuration parameters for a coding session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HuffmanConfig {
    /// Number of symbol values; every source byte must be below this.
    /// The single-symbol fix-up wraps modulo this value.
    pub alphabet_size: u16,
    /// Allowed deviation of the leaf probability sum from 1.0.
    pub probability_tolerance: f64,
}

impl HuffmanConfig {
    /// 7-bit ASCII alphabet.
    ///
    /// - 128 symbol values (0-127)
    /// - Synthetic symbol for `0x7F` input wraps to `0x00`
    pub const ASCII: Self = Self {
        alphabet_size: MAX_ALPHABET_SIZE,
        probability_tolerance: 1e-9,
    };

    /// Create a configuration for an alphabet of `alphabet_size` symbols.
    pub fn new(alphabet_size: u16) -> Result<Self> {
        let config = Self {
            alphabet_size,
            ..Self::ASCII
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the probability tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self> {
        self.probability_tolerance = tolerance;
        self.validate()?;
        Ok(self)
    }

    /// Check that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        // A one-symbol alphabet has no room for the synthetic second leaf
        if self.alphabet_size < 2 || self.alphabet_size > MAX_ALPHABET_SIZE {
            return Err(HuffpackError::invalid_config(format!(
                "alphabet size {} must be between 2 and {}",
                self.alphabet_size, MAX_ALPHABET_SIZE
            )));
        }
        if !self.probability_tolerance.is_finite() || self.probability_tolerance < 0.0 {
            return Err(HuffpackError::invalid_config(format!(
                "probability tolerance {} must be a finite non-negative number",
                self.probability_tolerance
            )));
        }
        Ok(())
    }

    /// Symbol that follows `symbol` in the cyclic alphabet.
    pub fn next_symbol(&self, symbol: u8) -> u8 {
        ((symbol as u16 + 1) % self.alphabet_size) as u8
    }
}

impl Default for HuffmanConfig {
    fn default() -> Self {
        Self::ASCII
    }
}
