use config::TableConfig;
use std::fs::{rename, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, SstError};
use crate::table::SsTable;

impl SsTable {
    /// Persists this table to `path`.
    ///
    /// # File Layout
    ///
    /// ```text
    /// [HEADER] timestamp(u64) | entry_number(u64) | min_key(u64) | max_key(u64)
    /// [FILTER] raw bit array, config.filter_bytes() long
    /// [INDEX]  repeated: key(u64) | offset(u32)
    /// [DATA]   values back to back, in index order
    /// ```
    ///
    /// `values` must be the same values the table was built from. Every
    /// value but the last is checked against the length the index implies
    /// before anything touches the disk.
    ///
    /// # Crash Safety
    ///
    /// Writes to `<path>.tmp`, calls `sync_all()`, then atomically renames.
    /// On failure the temp file is removed and `path` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SstError::LengthMismatch`] or [`SstError::ValueMismatch`] if
    /// `values` does not fit the index, or any I/O failure.
    pub fn write<P: AsRef<Path>, V: AsRef<[u8]>>(&self, path: P, values: &[V]) -> Result<()> {
        let path = path.as_ref();
        self.check_values(values)?;

        let tmp_path = tmp_path_for(path);
        if let Err(e) = self.write_file(&tmp_path, values) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e);
        }

        // Atomically move into place
        rename(&tmp_path, path)?;

        // Fsync the parent directory so the rename itself is durable.
        if let Some(parent) = path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        debug!(
            path = %path.display(),
            timestamp = self.header.timestamp,
            entries = self.header.entry_number,
            min_key = self.header.min_key,
            max_key = self.header.max_key,
            "wrote sstable"
        );
        Ok(())
    }

    fn check_values<V: AsRef<[u8]>>(&self, values: &[V]) -> Result<()> {
        if values.len() != self.index.len() {
            return Err(SstError::LengthMismatch {
                keys: self.index.len(),
                values: values.len(),
            });
        }
        let entries = self.index.entries();
        for (pair, value) in entries.windows(2).zip(values) {
            let expected = u64::from(pair[1].offset - pair[0].offset);
            let actual = value.as_ref().len() as u64;
            if expected != actual {
                return Err(SstError::ValueMismatch {
                    key: pair[0].key,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    fn write_file<V: AsRef<[u8]>>(&self, tmp_path: &Path, values: &[V]) -> Result<()> {
        let raw_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(tmp_path)?;
        let mut file = BufWriter::new(raw_file);

        self.header.write_to(&mut file)?;
        self.filter.write_to(&mut file)?;
        self.index.write_to(&mut file)?;
        for value in values {
            file.write_all(value.as_ref())?;
        }

        // Flush BufWriter, then sync the underlying file
        file.flush()?;
        file.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        Ok(())
    }
}

/// Temp file a write to `path` goes through: the full file name plus `.tmp`,
/// so distinct targets never share one.
pub(crate) fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Builds and persists a table in one step.
///
/// Stateless; kept as a separate entry point for callers that hold sorted
/// data and have no use for the intermediate [`SsTable`] until it is on disk.
pub struct SsTableWriter {}

impl SsTableWriter {
    /// Builds a table from sorted `keys`/`values`, writes it to `path`, and
    /// returns the in-memory table for subsequent lookups.
    ///
    /// # Errors
    ///
    /// Any error from [`SsTable::build`] or [`SsTable::write`].
    pub fn write_sorted<P: AsRef<Path>, V: AsRef<[u8]>>(
        path: P,
        timestamp: u64,
        keys: &[u64],
        values: &[V],
        config: &TableConfig,
    ) -> Result<SsTable> {
        let table = SsTable::build(timestamp, keys, values, config)?;
        table.write(path, values)?;
        Ok(table)
    }
}
