//! # Bloom Filter
//!
//! A fixed-capacity probabilistic set over 64-bit keys.
//!
//! A bloom filter can tell you with certainty that a key is **not** in the set
//! (no false negatives), but may occasionally report that a key **is** in the
//! set when it isn't (false positives).
//!
//! ## Usage in SSTables
//!
//! Every table embeds one filter built from its keys. A point lookup checks
//! the filter first -- if it says "not present", the index search and the
//! disk read are skipped entirely.
//!
//! ## Layout
//!
//! The capacity is measured in **bits**. Bits are packed eight per byte,
//! least significant bit first: bit `i` lives in byte `i / 8` at position
//! `i % 8`. On disk the filter is exactly [`BloomFilter::byte_len`] raw bytes
//! with no framing, so writer and reader must agree on the capacity.
//!
//! Each key is hashed (as its 8 little-endian bytes) to 128 bits, split into
//! four 32-bit words; every word reduced modulo the capacity names one bit.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bloom::BloomFilter;
//!
//! let mut bf = BloomFilter::new(8192);
//! bf.put(42);
//! assert!(bf.find(42));
//! ```

mod hash;

pub use hash::{murmur3_x64_128, FilterHash, Murmur3, DEFAULT_SEED};

use std::io::{self, Read, Write};
use thiserror::Error;

/// Errors raised when reconstituting a filter from raw bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The blob length does not match the declared bit capacity.
    #[error("filter blob is {actual} bytes, expected {expected} for {num_bits} bits")]
    WrongLength {
        num_bits: u64,
        expected: usize,
        actual: usize,
    },
}

/// A bloom filter with a fixed bit capacity and four probes per key.
#[derive(Clone)]
pub struct BloomFilter<H = Murmur3> {
    /// Packed bit array.
    bits: Vec<u8>,
    /// Capacity in bits (the modulus for every probe).
    num_bits: u64,
    hasher: H,
}

/// Returns the number of bytes needed to hold `num_bits` bits.
#[must_use]
pub fn byte_len_for(num_bits: u64) -> usize {
    num_bits.div_ceil(8) as usize
}

impl BloomFilter<Murmur3> {
    /// Creates an empty filter of `num_bits` bits using the default hasher.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` is 0.
    pub fn new(num_bits: u64) -> Self {
        Self::with_hasher(num_bits, Murmur3::default())
    }
}

impl<H: FilterHash> BloomFilter<H> {
    /// Creates an empty filter of `num_bits` bits using `hasher`.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` is 0.
    pub fn with_hasher(num_bits: u64, hasher: H) -> Self {
        assert!(num_bits > 0, "num_bits must be > 0");
        Self {
            bits: vec![0u8; byte_len_for(num_bits)],
            num_bits,
            hasher,
        }
    }

    /// Rebuilds a filter from its persisted bytes (loader path).
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::WrongLength`] if `bytes` is not exactly
    /// `ceil(num_bits / 8)` long.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` is 0.
    pub fn from_bytes(num_bits: u64, bytes: Vec<u8>, hasher: H) -> Result<Self, FilterError> {
        assert!(num_bits > 0, "num_bits must be > 0");
        let expected = byte_len_for(num_bits);
        if bytes.len() != expected {
            return Err(FilterError::WrongLength {
                num_bits,
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            bits: bytes,
            num_bits,
            hasher,
        })
    }

    /// Inserts a key.
    pub fn put(&mut self, key: u64) {
        for idx in self.probes(key) {
            self.set_bit(idx);
        }
    }

    /// Returns `true` if the key **might** be present, `false` if it is
    /// **definitely** absent.
    #[must_use]
    pub fn find(&self, key: u64) -> bool {
        self.probes(key).into_iter().all(|idx| self.get_bit(idx))
    }

    /// Returns the capacity in bits.
    #[must_use]
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Returns the size of the persisted filter in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.bits.len()
    }

    /// Returns the raw packed bit array.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Returns the hasher this filter probes with.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Writes the raw bit array to `w`, verbatim.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.bits)
    }

    /// Reads exactly `ceil(num_bits / 8)` bytes from `r` into a new filter.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` is 0.
    pub fn read_from<R: Read>(r: &mut R, num_bits: u64, hasher: H) -> io::Result<Self> {
        assert!(num_bits > 0, "num_bits must be > 0");
        let mut bits = vec![0u8; byte_len_for(num_bits)];
        r.read_exact(&mut bits)?;
        Ok(Self {
            bits,
            num_bits,
            hasher,
        })
    }

    // ---- Internal helpers ----

    /// The four bit positions derived from `key`.
    fn probes(&self, key: u64) -> [u64; 4] {
        self.hasher
            .hash128(&key.to_le_bytes())
            .map(|word| u64::from(word) % self.num_bits)
    }

    fn set_bit(&mut self, idx: u64) {
        let byte_idx = (idx / 8) as usize;
        let bit_offset = (idx % 8) as u8;
        self.bits[byte_idx] |= 1 << bit_offset;
    }

    fn get_bit(&self, idx: u64) -> bool {
        let byte_idx = (idx / 8) as usize;
        let bit_offset = (idx % 8) as u8;
        (self.bits[byte_idx] >> bit_offset) & 1 == 1
    }
}

impl<H> std::fmt::Debug for BloomFilter<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BloomFilter")
            .field("num_bits", &self.num_bits)
            .field("bytes", &self.bits.len())
            .field("set_bits", &self.bits.iter().map(|b| b.count_ones()).sum::<u32>())
            .finish()
    }
}
