mod index_tests;

use config::TableConfig;

/// The sample table used across tests: keys `[1, 5, 9]`, values `["aa", "bbb", "c"]`.
pub(crate) const KEYS: [u64; 3] = [1, 5, 9];
pub(crate) const VALUES: [&str; 3] = ["aa", "bbb", "c"];
pub(crate) const TIMESTAMP: u64 = 1_700_000_000;

/// Small filter so tests stay cheap; 1 KiB on disk.
pub(crate) fn small_config() -> TableConfig {
    TableConfig::new(8192)
}
