use bloom::{BloomFilter, Murmur3};
use config::TableConfig;
use tracing::debug;

use crate::error::{Result, SstError};
use crate::format::{data_region_base, index_bytes, index_start, Header};
use crate::index::TableIndex;

/// In-memory view of one SSTable: header, membership filter, and index.
///
/// Value bytes are never held here; [`get`](SsTable::get) reads them from
/// the backing file on demand. Once built, a table is never mutated.
#[derive(Debug, Clone)]
pub struct SsTable {
    pub(crate) header: Header,
    pub(crate) filter: BloomFilter<Murmur3>,
    pub(crate) index: TableIndex,
    pub(crate) config: TableConfig,
}

impl SsTable {
    /// Builds a table from ascending, duplicate-free `keys` and the parallel
    /// `values` (builder path).
    ///
    /// Each value's offset is the previous offset plus the previous value's
    /// length; the first offset is the index size, so values are packed
    /// immediately after the index table.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, the slices differ in length,
    /// the keys are not strictly ascending, a value would start beyond
    /// `u32::MAX`, or `config` is invalid.
    pub fn build<V: AsRef<[u8]>>(
        timestamp: u64,
        keys: &[u64],
        values: &[V],
        config: &TableConfig,
    ) -> Result<Self> {
        config.validate()?;
        let (&min_key, &max_key) = match (keys.first(), keys.last()) {
            (Some(min), Some(max)) => (min, max),
            _ => return Err(SstError::EmptyTable),
        };
        if keys.len() != values.len() {
            return Err(SstError::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        if let Some(position) = keys.windows(2).position(|w| w[0] >= w[1]) {
            return Err(SstError::Unsorted {
                position: position + 1,
                prev: keys[position],
                next: keys[position + 1],
            });
        }

        let mut filter = BloomFilter::with_hasher(config.filter_bits, Murmur3::new(config.hash_seed));
        let mut index = TableIndex::with_capacity(keys.len());

        let mut offset = index_bytes(keys.len() as u64);
        for (&key, value) in keys.iter().zip(values) {
            let this_offset = u32::try_from(offset).map_err(|_| SstError::OffsetOverflow { key })?;
            filter.put(key);
            index.push(key, this_offset);
            offset += value.as_ref().len() as u64;
        }

        let header = Header {
            timestamp,
            entry_number: keys.len() as u64,
            min_key,
            max_key,
        };
        debug!(
            timestamp,
            entries = header.entry_number,
            min_key,
            max_key,
            "built sstable"
        );

        Ok(Self {
            header,
            filter,
            index,
            config: *config,
        })
    }

    /// Reassembles a table from a previously read header, filter, and index
    /// (loader path).
    ///
    /// # Errors
    ///
    /// Returns [`SstError::Corrupt`] if the parts disagree with each other or
    /// with `config`.
    pub fn from_parts(
        header: Header,
        filter: BloomFilter<Murmur3>,
        index: TableIndex,
        config: TableConfig,
    ) -> Result<Self> {
        config.validate()?;
        if filter.num_bits() != config.filter_bits {
            return Err(SstError::Corrupt(format!(
                "filter has {} bits, config expects {}",
                filter.num_bits(),
                config.filter_bits
            )));
        }
        if header.entry_number != index.len() as u64 {
            return Err(SstError::Corrupt(format!(
                "header declares {} entries, index has {}",
                header.entry_number,
                index.len()
            )));
        }
        let (first, last) = match (index.first(), index.last()) {
            (Some(first), Some(last)) => (first.key, last.key),
            _ => return Err(SstError::Corrupt("table has no entries".into())),
        };
        if header.min_key != first || header.max_key != last {
            return Err(SstError::Corrupt(format!(
                "header key range [{}, {}] does not match index [{}, {}]",
                header.min_key, header.max_key, first, last
            )));
        }
        index.validate()?;

        Ok(Self {
            header,
            filter,
            index,
            config,
        })
    }

    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[must_use]
    pub fn filter(&self) -> &BloomFilter<Murmur3> {
        &self.filter
    }

    #[must_use]
    pub fn index(&self) -> &TableIndex {
        &self.index
    }

    /// The settings this table was built or opened with.
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Always `false` for a successfully built or loaded table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if `key` lies within `[min_key, max_key]`.
    #[must_use]
    pub fn covers(&self, key: u64) -> bool {
        (self.header.min_key..=self.header.max_key).contains(&key)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.index.iter().map(|e| e.key)
    }

    /// Absolute file position of the index table (offsets are relative to it).
    #[must_use]
    pub fn index_start(&self) -> u64 {
        index_start(self.config.filter_bytes())
    }

    /// Absolute file position of the first value.
    #[must_use]
    pub fn data_region_base(&self) -> u64 {
        data_region_base(self.config.filter_bytes(), self.header.entry_number)
    }
}
