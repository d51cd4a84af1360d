//! SSTable binary format constants and header read/write helpers.
//!
//! ```text
//! offset 0                      [timestamp: u64][entry_number: u64][min_key: u64][max_key: u64]
//! offset 32                     [filter: filter_bytes raw]
//! offset 32 + filter_bytes      [index: entry_number x (key: u64, offset: u32)]
//! offset data_region_base       [values, packed in index order]
//! ```
//!
//! All integers are little-endian. Index offsets are measured from the start
//! of the index table, so the first value's offset equals the index size and
//! a value's absolute position is `32 + filter_bytes + offset`.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, Read, Result as IoResult, Write};
use std::path::Path;

/// Size of the fixed header: timestamp, entry count, min key, max key.
pub const HEADER_BYTES: u64 = 8 + 8 + 8 + 8;

/// Size of one index record: key (u64) + offset (u32).
pub const INDEX_ENTRY_BYTES: u64 = 8 + 4;

/// Fixed-width table header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Creation / version marker supplied by the caller.
    pub timestamp: u64,
    /// Number of key/value pairs.
    pub entry_number: u64,
    /// Smallest key in the table.
    pub min_key: u64,
    /// Largest key in the table.
    pub max_key: u64,
}

impl Header {
    /// Writes the 32-byte header to `w`.
    pub fn write_to<W: Write>(&self, w: &mut W) -> IoResult<()> {
        w.write_u64::<LittleEndian>(self.timestamp)?;
        w.write_u64::<LittleEndian>(self.entry_number)?;
        w.write_u64::<LittleEndian>(self.min_key)?;
        w.write_u64::<LittleEndian>(self.max_key)?;
        Ok(())
    }

    /// Reads a 32-byte header from `r`.
    pub fn read_from<R: Read>(r: &mut R) -> IoResult<Self> {
        Ok(Self {
            timestamp: r.read_u64::<LittleEndian>()?,
            entry_number: r.read_u64::<LittleEndian>()?,
            min_key: r.read_u64::<LittleEndian>()?,
            max_key: r.read_u64::<LittleEndian>()?,
        })
    }
}

/// Reads only the header of the table at `path`.
pub fn read_header<P: AsRef<Path>>(path: P) -> IoResult<Header> {
    let mut f = BufReader::new(File::open(path)?);
    Header::read_from(&mut f)
}

/// Size of an index holding `entry_number` records.
#[must_use]
pub fn index_bytes(entry_number: u64) -> u64 {
    entry_number * INDEX_ENTRY_BYTES
}

/// Absolute file position where the index table starts.
#[must_use]
pub fn index_start(filter_bytes: u64) -> u64 {
    HEADER_BYTES + filter_bytes
}

/// Absolute file position where the first value starts.
#[must_use]
pub fn data_region_base(filter_bytes: u64, entry_number: u64) -> u64 {
    index_start(filter_bytes) + index_bytes(entry_number)
}
