use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::cmp::Ordering;
use std::io::{Read, Result as IoResult, Write};
use tracing::trace;

use crate::error::{Result, SstError};
use crate::format::index_bytes;

/// One index record: where the value for `key` begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: u64,
    /// Byte position relative to the start of the index table.
    pub offset: u32,
}

/// Byte range of a value, relative to the start of the index table.
///
/// `end` is `None` for the last entry, whose value runs to end-of-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    pub start: u32,
    pub end: Option<u32>,
}

impl ValueRange {
    /// Length of the value, if bounded.
    ///
    /// Also `None` when `end` precedes `start`, which only an unvalidated
    /// index can produce; use [`is_inverted`](ValueRange::is_inverted) to
    /// tell that case apart from the last entry.
    #[must_use]
    pub fn bounded_len(&self) -> Option<u32> {
        self.end.and_then(|end| end.checked_sub(self.start))
    }

    /// `true` if `end` lies before `start`.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        matches!(self.end, Some(end) if end < self.start)
    }
}

/// Ordered `(key, offset)` records, ascending by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableIndex {
    entries: Vec<IndexEntry>,
}

impl TableIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends a record. Callers must push keys in ascending order;
    /// [`validate`](TableIndex::validate) checks this after the fact.
    pub fn push(&mut self, key: u64, offset: u32) {
        self.entries.push(IndexEntry { key, offset });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn first(&self) -> Option<&IndexEntry> {
        self.entries.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&IndexEntry> {
        self.entries.last()
    }

    /// Serialized size of this index.
    #[must_use]
    pub fn byte_len(&self) -> u64 {
        index_bytes(self.entries.len() as u64)
    }

    /// Binary-searches for `key` and returns the byte range of its value.
    #[must_use]
    pub fn find(&self, key: u64) -> Option<ValueRange> {
        // Half-open [lo, hi); never steps below zero.
        let (mut lo, mut hi) = (0usize, self.entries.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let entry = self.entries[mid];
            trace!(key, mid, entry_key = entry.key, offset = entry.offset, "index search step");
            match entry.key.cmp(&key) {
                Ordering::Equal => {
                    return Some(ValueRange {
                        start: entry.offset,
                        end: self.entries.get(mid + 1).map(|next| next.offset),
                    });
                }
                Ordering::Greater => hi = mid,
                Ordering::Less => lo = mid + 1,
            }
        }
        None
    }

    /// Checks ordering: keys strictly ascending, offsets non-decreasing,
    /// and the first offset equal to the index size.
    pub fn validate(&self) -> Result<()> {
        if let Some(first) = self.entries.first() {
            if u64::from(first.offset) != self.byte_len() {
                return Err(SstError::Corrupt(format!(
                    "first offset {} does not follow index of {} bytes",
                    first.offset,
                    self.byte_len()
                )));
            }
        }
        for pair in self.entries.windows(2) {
            if pair[0].key >= pair[1].key {
                return Err(SstError::Corrupt(format!(
                    "index keys out of order: {} then {}",
                    pair[0].key, pair[1].key
                )));
            }
            if pair[0].offset > pair[1].offset {
                return Err(SstError::Corrupt(format!(
                    "index offsets decrease at key {}: {} then {}",
                    pair[1].key, pair[0].offset, pair[1].offset
                )));
            }
        }
        Ok(())
    }

    /// Writes every record as `key (u64 LE) | offset (u32 LE)`.
    pub fn write_to<W: Write>(&self, w: &mut W) -> IoResult<()> {
        for entry in &self.entries {
            w.write_u64::<LittleEndian>(entry.key)?;
            w.write_u32::<LittleEndian>(entry.offset)?;
        }
        Ok(())
    }

    /// Reads `count` records from `r`, preserving their on-disk order.
    pub fn read_from<R: Read>(r: &mut R, count: usize) -> IoResult<Self> {
        let mut index = Self::with_capacity(count);
        for _ in 0..count {
            let key = r.read_u64::<LittleEndian>()?;
            let offset = r.read_u32::<LittleEndian>()?;
            index.push(key, offset);
        }
        Ok(index)
    }
}
