//! Domain layer: the membership structures themselves.

pub mod bloom_filter;
pub mod exact_set;
pub mod hash_functions;
pub mod stable_bloom;

pub use bloom_filter::BloomFilter;
pub use exact_set::ExactSet;
pub use stable_bloom::StableBloomFilter;

use crate::config::{DuplicateMethod, MembershipConfig};

/// The duplicate-detection backend selected for a run.
///
/// Resolved once at gateway construction from [`MembershipConfig`]; the
/// per-message hot path dispatches on the variant, never on configuration
/// strings.
#[derive(Debug)]
pub enum DuplicateStore {
    /// Exact containment.
    ExactSet(ExactSet),
    /// Classic Bloom filter.
    Bloom(BloomFilter),
    /// Stable Bloom Filter.
    Stable(StableBloomFilter),
}

impl DuplicateStore {
    /// Build the backend named by `config` (already normalized).
    ///
    /// `seed` drives the SBF's aging randomness so runs are reproducible.
    pub fn from_config(config: &MembershipConfig, seed: u64) -> Self {
        match config.method {
            DuplicateMethod::Set => DuplicateStore::ExactSet(ExactSet::new()),
            DuplicateMethod::Bloom => {
                DuplicateStore::Bloom(BloomFilter::new(config.bloom_bits, config.bloom_hashes))
            }
            DuplicateMethod::Sbf => DuplicateStore::Stable(StableBloomFilter::new(
                config.sbf_bits,
                config.sbf_hashes,
                config.sbf_decay,
                seed,
            )),
        }
    }

    /// Whether `id` has (probably) been seen before.
    pub fn test(&self, id: i64) -> bool {
        match self {
            DuplicateStore::ExactSet(set) => set.test(id),
            DuplicateStore::Bloom(filter) => filter.test(id),
            DuplicateStore::Stable(filter) => filter.test(id),
        }
    }

    /// Register `id` as seen.
    pub fn insert(&mut self, id: i64) {
        match self {
            DuplicateStore::ExactSet(set) => set.insert(id),
            DuplicateStore::Bloom(filter) => filter.insert(id),
            DuplicateStore::Stable(filter) => filter.insert(id),
        }
    }

    /// The method this store realizes.
    pub fn method(&self) -> DuplicateMethod {
        match self {
            DuplicateStore::ExactSet(_) => DuplicateMethod::Set,
            DuplicateStore::Bloom(_) => DuplicateMethod::Bloom,
            DuplicateStore::Stable(_) => DuplicateMethod::Sbf,
        }
    }

    /// True for the backends that can report false positives.
    pub fn is_probabilistic(&self) -> bool {
        !matches!(self, DuplicateStore::ExactSet(_))
    }
}
