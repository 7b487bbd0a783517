//! Stable Bloom Filter: bounded steady-state false positives under
//! continuous insertion.
//!
//! Counters replace bits, packed two 4-bit values per byte. Every insert
//! first ages the structure by decrementing a few uniformly random positive
//! counters, then increments the target counters up to the cap. `test`
//! reports seen iff every target counter is non-zero.
//!
//! The aging trades a capped false-positive rate for possible false
//! negatives on identifiers that have not been refreshed for a long time.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::hash_functions::{positions, SBF_SEED_DOMAIN};

/// Maximum counter value (4-bit).
const MAX_COUNTER: u8 = 15;

/// Stable Bloom Filter with 4-bit counters and probabilistic aging.
#[derive(Debug)]
pub struct StableBloomFilter {
    /// 4-bit counters packed into bytes (2 counters per byte).
    counters: Vec<u8>,
    /// Size in counters (not bytes).
    m: usize,
    /// Hash derivations per element.
    k: usize,
    /// Counters decremented per insert: `max(1, round(decay * max(1, k)))`.
    decrements_per_insert: usize,
    /// Seeded generator for the aging positions; seeding keeps runs
    /// reproducible.
    rng: SmallRng,
    /// Number of insert calls.
    n: u64,
}

impl StableBloomFilter {
    /// Create a filter of `m` counters with `k` hash derivations and the
    /// given aging factor. Parameters arrive normalized (m >= 8, k >= 1).
    pub fn new(m: usize, k: usize, decay: f64, seed: u64) -> Self {
        let decrements = (decay * k.max(1) as f64).round() as usize;
        Self {
            counters: vec![0u8; m.div_ceil(2)],
            m,
            k,
            decrements_per_insert: decrements.max(1),
            rng: SmallRng::seed_from_u64(seed),
            n: 0,
        }
    }

    /// Record `id` as seen: age, then raise the target counters.
    pub fn insert(&mut self, id: i64) {
        self.age();
        for pos in positions(id as u64, self.k, self.m, SBF_SEED_DOMAIN) {
            self.increment(pos);
        }
        self.n += 1;
    }

    /// Whether `id` has (probably) been seen recently.
    pub fn test(&self, id: i64) -> bool {
        positions(id as u64, self.k, self.m, SBF_SEED_DOMAIN)
            .iter()
            .all(|&pos| self.counter(pos) > 0)
    }

    /// Decrement a handful of uniformly random positive counters.
    fn age(&mut self) {
        for _ in 0..self.decrements_per_insert {
            let pos = self.rng.gen_range(0..self.m);
            self.decrement(pos);
        }
    }

    /// Counter value at `pos`.
    fn counter(&self, pos: usize) -> u8 {
        let byte = self.counters[pos / 2];
        if pos % 2 == 0 {
            byte >> 4
        } else {
            byte & 0x0f
        }
    }

    fn set_counter(&mut self, pos: usize, value: u8) {
        let byte = &mut self.counters[pos / 2];
        if pos % 2 == 0 {
            *byte = (*byte & 0x0f) | (value << 4);
        } else {
            *byte = (*byte & 0xf0) | value;
        }
    }

    /// Increment at `pos`, saturating at [`MAX_COUNTER`].
    fn increment(&mut self, pos: usize) {
        let current = self.counter(pos);
        if current < MAX_COUNTER {
            self.set_counter(pos, current + 1);
        }
    }

    /// Decrement at `pos`, saturating at 0.
    fn decrement(&mut self, pos: usize) {
        let current = self.counter(pos);
        if current > 0 {
            self.set_counter(pos, current - 1);
        }
    }

    /// Size in counters.
    pub fn size_counters(&self) -> usize {
        self.m
    }

    /// Hash derivations per element.
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Counters decremented on every insert.
    pub fn decrements_per_insert(&self) -> usize {
        self.decrements_per_insert
    }

    /// Number of insert calls so far.
    pub fn elements_inserted(&self) -> u64 {
        self.n
    }
}
