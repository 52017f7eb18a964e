//! Error types for huffpack operations.
//!
//! A single error type covers every failure in the coding pipeline: source
//! analysis, bit packing, header parsing, and the byte-stream collaborators.

use std::io;
use thiserror::Error;

/// The main error type for huffpack operations.
#[derive(Debug, Error)]
pub enum HuffpackError {
    /// I/O error from an underlying byte source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source produced no symbols, so no probabilities can be computed.
    #[error("Empty source: at least one symbol is required to build a code")]
    EmptySource,

    /// A source byte falls outside the coding alphabet.
    #[error("Symbol out of range at offset {offset}: byte {byte:#04x} is not below {alphabet_size}")]
    SymbolOutOfRange {
        /// Byte offset of the offending symbol in the source.
        offset: u64,
        /// The offending byte.
        byte: u8,
        /// Size of the alphabet in use.
        alphabet_size: u16,
    },

    /// A bit string contained something other than `0` or `1`.
    #[error("Invalid bit character {found:?} at position {position}")]
    InvalidBitCharacter {
        /// Character index within the bit string.
        position: usize,
        /// The character found.
        found: char,
    },

    /// No padding sentinel was found in the first byte of packed input.
    #[error("Padding header not found (first byte: {first_byte:02x?})")]
    HeaderNotFound {
        /// The first byte of the input, if there was one.
        first_byte: Option<u8>,
    },

    /// A symbol being encoded has no code in the table.
    #[error("Symbol {symbol:#04x} has no assigned code")]
    UnmappedSymbol {
        /// The symbol without a code.
        symbol: u8,
    },

    /// Tree construction needs at least two frequency records.
    #[error("Too few symbols to build a tree: found {found}, need at least 2")]
    TooFewSymbols {
        /// Number of records supplied.
        found: usize,
    },

    /// The number of bits pushed into a packer differs from the declared length.
    #[error("Payload length mismatch: declared {expected} bits, received {actual}")]
    PayloadLengthMismatch {
        /// Declared payload length in bits.
        expected: u64,
        /// Bits actually pushed.
        actual: u64,
    },

    /// Invalid codec configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },
}

/// Result type alias for huffpack operations.
pub type Result<T> = std::result::Result<T, HuffpackError>;

impl HuffpackError {
    /// Create a symbol out of range error.
    pub fn symbol_out_of_range(offset: u64, byte: u8, alphabet_size: u16) -> Self {
        Self::SymbolOutOfRange {
            offset,
            byte,
            alphabet_size,
        }
    }

    /// Create an invalid bit character error.
    pub fn invalid_bit_character(position: usize, found: char) -> Self {
        Self::InvalidBitCharacter { position, found }
    }

    /// Create a header not found error.
    pub fn header_not_found(first_byte: Option<u8>) -> Self {
        Self::HeaderNotFound { first_byte }
    }

    /// Create an unmapped symbol error.
    pub fn unmapped_symbol(symbol: u8) -> Self {
        Self::UnmappedSymbol { symbol }
    }

    /// Create a too few symbols error.
    pub fn too_few_symbols(found: usize) -> Self {
        Self::TooFewSymbols { found }
    }

    /// Create a payload length mismatch error.
    pub fn payload_length_mismatch(expected: u64, actual: u64) -> Self {
        Self::PayloadLengthMismatch { expected, actual }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HuffpackError::header_not_found(Some(0x00));
        assert!(err.to_string().contains("Padding header not found"));

        let err = HuffpackError::invalid_bit_character(3, '2');
        assert!(err.to_string().contains("'2'"));
        assert!(err.to_string().contains("position 3"));

        let err = HuffpackError::symbol_out_of_range(7, 0xC3, 128);
        assert!(err.to_string().contains("0xc3"));

        let err = HuffpackError::header_not_found(None);
        assert!(err.to_string().contains("None"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: HuffpackError = io_err.into();
        assert!(matches!(err, HuffpackError::Io(_)));
    }
}
