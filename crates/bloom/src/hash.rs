//! 128-bit hashing used to derive filter bit positions.
//!
//! The filter only needs four 32-bit words per key. Any [`FilterHash`] works
//! as long as the same implementation (and seed) is used when the filter is
//! built and when it is queried.

/// A pure function from bytes to 128 bits, exposed as four 32-bit words.
pub trait FilterHash {
    /// Hashes `bytes` into four 32-bit words.
    fn hash128(&self, bytes: &[u8]) -> [u32; 4];
}

/// Default seed used when none is configured.
pub const DEFAULT_SEED: u32 = 1;

/// MurmurHash3, x64 128-bit variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Murmur3 {
    seed: u32,
}

impl Murmur3 {
    /// Creates a hasher with the given seed.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Returns the seed.
    #[must_use]
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for Murmur3 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl FilterHash for Murmur3 {
    fn hash128(&self, bytes: &[u8]) -> [u32; 4] {
        let (h1, h2) = murmur3_x64_128(bytes, self.seed);
        [h1 as u32, (h1 >> 32) as u32, h2 as u32, (h2 >> 32) as u32]
    }
}

const C1: u64 = 0x87c3_7b91_1142_53d5;
const C2: u64 = 0x4cf5_ad43_2745_937f;

/// Computes MurmurHash3 x64/128 of `data`, returning the `(h1, h2)` halves.
pub fn murmur3_x64_128(data: &[u8], seed: u32) -> (u64, u64) {
    let mut h1 = seed as u64;
    let mut h2 = seed as u64;

    let mut blocks = data.chunks_exact(16);
    for block in &mut blocks {
        let mut k1 = read_u64_le(&block[..8]);
        let mut k2 = read_u64_le(&block[8..]);

        k1 = k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2);
        h1 ^= k1;
        h1 = h1
            .rotate_left(27)
            .wrapping_add(h2)
            .wrapping_mul(5)
            .wrapping_add(0x52dc_e729);

        k2 = k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1);
        h2 ^= k2;
        h2 = h2
            .rotate_left(31)
            .wrapping_add(h1)
            .wrapping_mul(5)
            .wrapping_add(0x3849_5ab5);
    }

    let tail = blocks.remainder();
    if tail.len() > 8 {
        let k2 = read_u64_le(&tail[8..]);
        h2 ^= k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1);
    }
    if !tail.is_empty() {
        let k1 = read_u64_le(&tail[..tail.len().min(8)]);
        h1 ^= k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2);
    }

    let len = data.len() as u64;
    h1 ^= len;
    h2 ^= len;

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    h1 = fmix64(h1);
    h2 = fmix64(h2);

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    (h1, h2)
}

/// Little-endian load of up to 8 bytes, zero-padded.
fn read_u64_le(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf[..bytes.len()].copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^= k >> 33;
    k
}
