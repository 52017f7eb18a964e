//! Byte-stream collaborators.
//!
//! The coding pipeline works on fully materialized byte slices. These helpers
//! move bytes between those slices and any `Read`/`Write` implementation, so
//! all boundary failures surface as [`HuffpackError::Io`].
//!
//! [`HuffpackError::Io`]: crate::error::HuffpackError::Io

use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Read a source stream to its end.
pub fn read_source<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    Ok(data)
}

/// Write all bytes to a sink and flush it.
pub fn write_sink<W: Write>(mut writer: W, data: &[u8]) -> Result<()> {
    writer.write_all(data)?;
    writer.flush()?;
    Ok(())
}

/// Read an entire file.
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    read_source(BufReader::new(file))
}

/// Create (or truncate) a file and write all bytes to it.
pub fn write_file(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let file = File::create(path)?;
    write_sink(BufWriter::new(file), data)
}
