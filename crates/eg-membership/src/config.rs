//! Membership structure configuration and normalization.
//!
//! Malformed values are recovered locally with a safe default and a logged
//! diagnostic, never a hard error: a run must complete to produce comparative
//! statistics.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Minimum bit/counter array size accepted for the probabilistic structures.
pub const MIN_BITS: usize = 8;

/// Minimum number of hash derivations.
pub const MIN_HASHES: usize = 1;

/// Array sizes below this trigger a diagnostic: the structure will saturate
/// almost immediately under realistic traffic.
pub const LOW_BITS_WARNING: usize = 1024;

/// Which duplicate-detection backend the gateway runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateMethod {
    /// Exact containment, unbounded growth, zero false positives.
    Set,
    /// Classic Bloom filter, monotonically filling.
    Bloom,
    /// Stable Bloom Filter with probabilistic aging.
    Sbf,
}

impl DuplicateMethod {
    /// Parse a configuration string, falling back to [`DuplicateMethod::Set`]
    /// on anything unrecognized.
    pub fn parse_lossy(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "set" => DuplicateMethod::Set,
            "bloom" => DuplicateMethod::Bloom,
            "sbf" => DuplicateMethod::Sbf,
            other => {
                warn!(method = other, "unknown duplicate method, falling back to exact set");
                DuplicateMethod::Set
            }
        }
    }

    /// Stable lowercase name for reports.
    pub fn as_str(self) -> &'static str {
        match self {
            DuplicateMethod::Set => "set",
            DuplicateMethod::Bloom => "bloom",
            DuplicateMethod::Sbf => "sbf",
        }
    }
}

/// Sizing parameters for the duplicate-detection structures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipConfig {
    /// Selected backend.
    pub method: DuplicateMethod,
    /// Bloom filter bit-array size.
    pub bloom_bits: usize,
    /// Bloom filter hash derivations per element.
    pub bloom_hashes: usize,
    /// SBF counter-array size.
    pub sbf_bits: usize,
    /// SBF hash derivations per element.
    pub sbf_hashes: usize,
    /// SBF aging factor: decrements per insert are
    /// `max(1, round(sbf_decay * max(1, sbf_hashes)))`.
    pub sbf_decay: f64,
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            method: DuplicateMethod::Set,
            bloom_bits: 16_384,
            bloom_hashes: 4,
            sbf_bits: 16_384,
            sbf_hashes: 3,
            sbf_decay: 1.0,
        }
    }
}

impl MembershipConfig {
    /// Enforce parameter floors, logging a diagnostic for every adjustment
    /// and for suspiciously small arrays.
    pub fn normalized(mut self) -> Self {
        if self.bloom_bits < MIN_BITS {
            warn!(bloom_bits = self.bloom_bits, floor = MIN_BITS, "bloom_bits below floor, raising");
            self.bloom_bits = MIN_BITS;
        }
        if self.bloom_hashes < MIN_HASHES {
            warn!(bloom_hashes = self.bloom_hashes, floor = MIN_HASHES, "bloom_hashes below floor, raising");
            self.bloom_hashes = MIN_HASHES;
        }
        if self.sbf_bits < MIN_BITS {
            warn!(sbf_bits = self.sbf_bits, floor = MIN_BITS, "sbf_bits below floor, raising");
            self.sbf_bits = MIN_BITS;
        }
        if self.sbf_hashes < MIN_HASHES {
            warn!(sbf_hashes = self.sbf_hashes, floor = MIN_HASHES, "sbf_hashes below floor, raising");
            self.sbf_hashes = MIN_HASHES;
        }
        if self.bloom_bits < LOW_BITS_WARNING {
            warn!(bloom_bits = self.bloom_bits, "bloom filter is undersized and will saturate quickly");
        }
        if self.sbf_bits < LOW_BITS_WARNING {
            warn!(sbf_bits = self.sbf_bits, "stable bloom filter is undersized");
        }
        self
    }
}
