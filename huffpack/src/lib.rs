//! # huffpack
//!
//! Pure Rust frequency-adaptive Huffman coding over a 7-bit alphabet.
//!
//! A source is scanned for symbol probabilities, a prefix-code tree is
//! built by repeatedly merging the two least probable nodes, and every
//! symbol is replaced by its root-to-leaf path. The resulting bit sequence
//! is stored MSB-first behind a small self-describing padding header.
//!
//! ## Pipeline
//!
//! ```text
//! source ─► FrequencyTable ─► HuffmanTree ─► EncodingTable
//!                                  │               │
//!                                  │     source ───┴─► BitPacker ─► packed
//!                                  ▼
//! packed ─► unpack ─► PackedBits ─► TreeDecoder ─► source
//! ```
//!
//! ## Format
//!
//! - No magic number, version, or code table
//! - Header: `padding - 1` zero bits then a `1`, with `padding` in `1..=8`
//! - Payload: concatenated codes, MSB-first
//!
//! The tree is not stored, so decoding needs the [`CodingSession`] that
//! produced the data (or one rebuilt from identical statistics).
//!
//! ## Example
//!
//! ```rust
//! use huffpack::{compress, decompress};
//!
//! let original = b"she sells sea shells by the sea shore";
//!
//! let (session, compressed) = compress(original).unwrap();
//! assert!(compressed.len() < original.len());
//!
//! let decompressed = decompress(&session, &compressed).unwrap();
//! assert_eq!(decompressed, original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod decode;
pub mod frequency;
pub mod packing;
pub mod session;
pub mod table;
pub mod tree;

// Re-exports
pub use config::HuffmanConfig;
pub use decode::TreeDecoder;
pub use frequency::{FrequencyRecord, FrequencyTable, Symbol};
pub use huffpack_core::{HuffpackError, Result};
pub use packing::{BitPacker, PackedBits, pack, pack_bit_string, padding_for, unpack};
pub use session::{CodingSession, EncodeStats};
pub use table::{Code, EncodingTable};
pub use tree::{HuffmanTree, NodeId, TreeNode};

/// Build a session from `data` and encode it.
///
/// # Example
///
/// ```rust
/// use huffpack::compress;
///
/// let (session, compressed) = compress(b"aaab").unwrap();
/// assert_eq!(session.tree().leaf_count(), 2);
/// assert_eq!(compressed, vec![0b0001_1110]);
/// ```
pub fn compress(data: &[u8]) -> Result<(CodingSession, Vec<u8>)> {
    let session = CodingSession::analyze(data)?;
    let compressed = session.encode(data)?;
    Ok((session, compressed))
}

/// Decode data produced by `session`.
///
/// # Example
///
/// ```rust
/// use huffpack::{compress, decompress};
///
/// let (session, compressed) = compress(b"zzzz").unwrap();
/// assert_eq!(decompress(&session, &compressed).unwrap(), b"zzzz");
/// ```
pub fn decompress(session: &CodingSession, data: &[u8]) -> Result<Vec<u8>> {
    session.decode(data)
}
