//! # EdgeGuard Membership Structures
//!
//! Interchangeable duplicate-detection backends for the admission pipeline.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): pure data structures, no I/O
//!   - `ExactSet`: authoritative set, zero false positives, unbounded growth
//!   - `BloomFilter`: fixed bit array, monotonically filling, never ages
//!   - `StableBloomFilter`: 4-bit counters with probabilistic aging, bounded
//!     steady-state false-positive rate
//!   - `DuplicateStore`: tagged variant selecting one backend at
//!     construction time, so the hot path never branches on strings
//! - **Configuration** (`config`): sizing parameters with enforced floors
//!   and lossy method parsing that recovers to the exact set
//! - **Metrics** (`metrics`): query/insert counters and false-positive
//!   accounting cross-checked against ground truth
//!
//! ## Invariants
//!
//! - **No false negatives (Bloom)**: once inserted, `test` returns true for
//!   the lifetime of the filter
//! - **Counter range (SBF)**: every counter stays within [0, 15]
//! - **Measurement isolation**: ground-truth cross-checking feeds metrics
//!   only; admission decisions never consult it
//!
//! The hash derivation is a seeded 64-bit mixer, not a cryptographic hash;
//! its collision structure is unverified and it must not be reused where an
//! adversary controls both sides of a collision.

pub mod config;
pub mod domain;
pub mod metrics;

// Re-exports for convenience
pub use config::{DuplicateMethod, MembershipConfig};
pub use domain::{BloomFilter, DuplicateStore, ExactSet, StableBloomFilter};
pub use metrics::MembershipMetrics;
