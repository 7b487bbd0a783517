//! Classic Bloom filter over 64-bit message identifiers.
//!
//! INVARIANTS:
//! - No false negatives: once inserted, `test` returns true forever
//! - Monotone fill: bits are only ever set, never cleared, so the
//!   false-positive rate grows with the number of insertions

use bitvec::prelude::*;

use super::hash_functions::{positions, BLOOM_SEED_DOMAIN};

/// Fixed-size, insert-only probabilistic membership filter.
#[derive(Debug, Clone)]
pub struct BloomFilter {
    /// Bit array storing the filter state.
    bits: BitVec<u8, Lsb0>,
    /// Number of hash derivations per element (k).
    k: usize,
    /// Size in bits (m).
    m: usize,
    /// Number of insert calls (n).
    n: u64,
}

impl BloomFilter {
    /// Create a filter of `m` bits with `k` hash derivations.
    ///
    /// Callers pass normalized parameters; the configuration layer enforces
    /// the floors (m >= 8, k >= 1).
    pub fn new(m: usize, k: usize) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; m],
            k,
            m,
            n: 0,
        }
    }

    /// Record `id` as seen by setting all of its derived positions.
    pub fn insert(&mut self, id: i64) {
        for pos in positions(id as u64, self.k, self.m, BLOOM_SEED_DOMAIN) {
            self.bits.set(pos, true);
        }
        self.n += 1;
    }

    /// Whether `id` might have been inserted.
    ///
    /// True only if every derived position is set; false means definitely
    /// never inserted.
    pub fn test(&self, id: i64) -> bool {
        positions(id as u64, self.k, self.m, BLOOM_SEED_DOMAIN)
            .iter()
            .all(|&pos| self.bits[pos])
    }

    /// Number of bits currently set.
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Filter size in bits.
    pub fn size_bits(&self) -> usize {
        self.m
    }

    /// Hash derivations per element.
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Number of insert calls so far.
    pub fn elements_inserted(&self) -> u64 {
        self.n
    }
}
