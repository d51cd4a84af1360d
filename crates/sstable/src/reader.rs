use bloom::{BloomFilter, Murmur3};
use config::TableConfig;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, trace};

use crate::error::{Result, SstError};
use crate::format::{index_start, Header, INDEX_ENTRY_BYTES};
use crate::index::TableIndex;
use crate::table::SsTable;

impl SsTable {
    /// Loads the header, filter, and index of the table at `path`.
    ///
    /// `config` must match the one the table was written with; the filter
    /// carries no size prefix.
    ///
    /// # Validation
    ///
    /// - The file must hold at least the header and the filter.
    /// - The declared entry count must be non-zero and fit in the file.
    /// - The index must be ascending with non-decreasing offsets, agree
    ///   with the header's min/max, and point inside the file.
    ///
    /// # Errors
    ///
    /// Returns [`SstError::Corrupt`] on any validation failure, or an I/O
    /// error.
    pub fn open<P: AsRef<Path>>(path: P, config: &TableConfig) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref();
        let f = File::open(path)?;
        let filesize = f.metadata()?.len();
        let mut f = BufReader::new(f);

        let index_start = index_start(config.filter_bytes());
        if filesize < index_start {
            return Err(SstError::Corrupt(format!(
                "file is {} bytes, smaller than header + filter ({})",
                filesize, index_start
            )));
        }

        let header = Header::read_from(&mut f)?;
        let max_entries = (filesize - index_start) / INDEX_ENTRY_BYTES;
        if header.entry_number == 0 || header.entry_number > max_entries {
            return Err(SstError::Corrupt(format!(
                "entry count {} impossible for a {} byte file",
                header.entry_number, filesize
            )));
        }

        let filter = BloomFilter::read_from(
            &mut f,
            config.filter_bits,
            Murmur3::new(config.hash_seed),
        )?;
        let index = TableIndex::read_from(&mut f, header.entry_number as usize)?;
        let table = Self::from_parts(header, filter, index, *config)?;

        if let Some(last) = table.index.last() {
            if index_start + u64::from(last.offset) > filesize {
                return Err(SstError::Corrupt(format!(
                    "last value offset {} lies past end of {} byte file",
                    last.offset, filesize
                )));
            }
        }

        debug!(
            path = %path.display(),
            timestamp = header.timestamp,
            entries = header.entry_number,
            min_key = header.min_key,
            max_key = header.max_key,
            "opened sstable"
        );
        Ok(table)
    }

    /// Point lookup for `key` against the backing file at `path`.
    ///
    /// Returns `Ok(None)` when the key is not in this table and
    /// `Ok(Some(bytes))` (possibly empty) when it is. The file is opened
    /// per call and only if the filter and the index both admit the key.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// [`SstError::Truncated`] if a bounded value is cut short.
    pub fn get<P: AsRef<Path>>(&self, path: P, key: u64) -> Result<Option<Vec<u8>>> {
        let path = path.as_ref();
        self.get_with(key, || File::open(path))
    }

    /// Point lookup reading through whatever `open` returns.
    ///
    /// `open` is called at most once, and not at all when the filter or the
    /// index rules the key out.
    pub fn get_with<R, F>(&self, key: u64, open: F) -> Result<Option<Vec<u8>>>
    where
        R: Read + Seek,
        F: FnOnce() -> io::Result<R>,
    {
        // Fast path: filter says "definitely not here"
        if !self.filter.find(key) {
            trace!(key, "filter rules key out");
            return Ok(None);
        }

        let range = match self.index.find(key) {
            Some(range) => range,
            None => {
                trace!(key, "filter false positive, key not in index");
                return Ok(None);
            }
        };

        if range.is_inverted() {
            return Err(SstError::Corrupt(format!(
                "value range for key {} ends before it starts: {:?}",
                key, range
            )));
        }

        let pos = self.index_start() + u64::from(range.start);
        let mut r = open()?;
        r.seek(SeekFrom::Start(pos))?;

        let mut value = Vec::new();
        match range.bounded_len() {
            // Last entry: the value runs to end-of-file.
            None => {
                r.read_to_end(&mut value)?;
            }
            Some(len) => {
                let expected = u64::from(len);
                value.reserve(len as usize);
                r.take(expected).read_to_end(&mut value)?;
                if value.len() as u64 != expected {
                    return Err(SstError::Truncated {
                        offset: pos,
                        expected,
                        actual: value.len() as u64,
                    });
                }
            }
        }

        trace!(key, offset = pos, len = value.len(), "read value");
        Ok(Some(value))
    }
}
