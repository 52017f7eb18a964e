//! # huffpack core
//!
//! Core components for the huffpack prefix-code library.
//!
//! - [`bitstream`]: MSB-first bit buffer and reader for code payloads
//! - [`io`]: Byte source and sink collaborators
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L2: Codec (huffpack)                                    │
//! │     Frequency analysis, merge tree, code table,         │
//! │     padded packing, tree-walk decoding                  │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitBuffer/BitReader, byte I/O, errors               │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use huffpack_core::bitstream::{BitBuffer, BitReader};
//!
//! let mut buffer = BitBuffer::new();
//! buffer.push_bits(0b0000_0001, 8);
//! buffer.push_bits(0b10, 2);
//!
//! let bits: Vec<bool> = BitReader::with_range(buffer.as_bytes(), 8, 2).collect();
//! assert_eq!(bits, vec![true, false]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod bitstream;
pub mod error;
pub mod io;

// Re-exports for convenience
pub use bitstream::{BitBuffer, BitReader};
pub use error::{HuffpackError, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitBuffer, BitReader};
    pub use crate::error::{HuffpackError, Result};
}
