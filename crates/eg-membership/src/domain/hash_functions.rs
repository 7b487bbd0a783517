//! Hash derivation for the probabilistic membership structures.
//!
//! A single 64-bit mixing function serves both filters; per-hash seeds are
//! scaled by a large odd constant before mixing, and the two structures use
//! disjoint seed ranges for domain separation.
//!
//! Not a cryptographic hash: collision structure is unverified. Fine for
//! simulation-grade membership testing where admission never depends on it.

/// Golden-ratio increment used to spread consecutive seeds across the
/// 64-bit space before mixing.
pub const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seed domain for the classic Bloom filter: seeds `0..k`.
pub const BLOOM_SEED_DOMAIN: u64 = 0;

/// Seed domain for the Stable Bloom Filter, disjoint from the Bloom range.
pub const SBF_SEED_DOMAIN: u64 = 1 << 32;

/// Finalizing 64-bit mixer (splitmix64 finalizer).
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Derive one array position for `id` under `seed`, modulo `m`.
pub fn position(id: u64, seed: u64, m: usize) -> usize {
    debug_assert!(m > 0, "array size must be positive");
    (mix64(id ^ seed.wrapping_mul(GOLDEN_GAMMA)) % m as u64) as usize
}

/// Derive the `k` positions for `id` in an array of size `m`, using seeds
/// `domain..domain + k`.
pub fn positions(id: u64, k: usize, m: usize, domain: u64) -> Vec<usize> {
    (0..k as u64).map(|i| position(id, domain + i, m)).collect()
}
