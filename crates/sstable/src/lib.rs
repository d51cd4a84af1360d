//! # SSTable - Sorted String Table
//!
//! Immutable, on-disk key/value segments with `u64` keys and byte-string
//! values. A table is built from already-sorted input, written once, and
//! then only read (until something outside this crate retires it).
//!
//! ## File layout
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ HEADER (32 bytes)                                             │
//! │                                                               │
//! │ timestamp (u64) | entry_number (u64)                          │
//! │ min_key (u64)   | max_key (u64)                               │
//! ├───────────────────────────────────────────────────────────────┤
//! │ FILTER (ceil(filter_bits / 8) bytes, raw)                     │
//! │                                                               │
//! │ Bloom filter bit array, four probes per key.                  │
//! ├───────────────────────────────────────────────────────────────┤
//! │ INDEX (entry_number x 12 bytes)                               │
//! │                                                               │
//! │ key (u64) | offset (u32)                                      │
//! │                                                               │
//! │ ... repeated, ascending by key ...                            │
//! │                                                               │
//! │ `offset` is relative to the start of the INDEX section, so    │
//! │ the first entry's offset is the size of the index itself.     │
//! ├───────────────────────────────────────────────────────────────┤
//! │ DATA                                                          │
//! │                                                               │
//! │ values back to back in index order, no delimiters. A value    │
//! │ ends where the next one starts; the last runs to EOF.         │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. The filter size is not stored in the
//! file: writer and reader share it through [`config::TableConfig`].
//!
//! ## Point lookup
//!
//! 1. Check the bloom filter; "definitely absent" returns without I/O.
//! 2. Binary-search the in-memory index for an exact match.
//! 3. Open the file, seek to the value and read its byte range.
//!
//! ## Example
//!
//! ```rust,no_run
//! use config::TableConfig;
//! use sstable::SsTableWriter;
//!
//! let cfg = TableConfig::default();
//! let table = SsTableWriter::write_sorted("t.sst", 1, &[1, 5, 9], &["aa", "bbb", "c"], &cfg).unwrap();
//! assert_eq!(table.get("t.sst", 5).unwrap(), Some(b"bbb".to_vec()));
//! ```

mod error;
mod format;
mod index;
mod reader;
mod table;
mod writer;

pub use error::{Result, SstError};
pub use format::{
    data_region_base, index_bytes, index_start, read_header, Header, HEADER_BYTES,
    INDEX_ENTRY_BYTES,
};
pub use index::{IndexEntry, TableIndex, ValueRange};
pub use table::SsTable;
pub use writer::SsTableWriter;

#[cfg(test)]
mod tests;
