//! End-of-run accounting scalars.
//!
//! One field per scalar so the test suite and downstream analysis can assert
//! on values directly; the binary emits this as JSON.

use serde::Serialize;

/// Per-stage evaluation counts and per-received-message averages.
///
/// A stage is counted only when it was actually evaluated for a message:
/// disabled stages and stages after the first failure contribute nothing,
/// which is what makes orderings comparable by computational cost.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StageWork {
    /// MAC verifications performed.
    pub mac: u64,
    /// Freshness checks performed.
    pub freshness: u64,
    /// Duplicate-structure queries performed.
    pub duplicate: u64,
    /// `mac / received`, zero when nothing was received.
    pub mac_per_received: f64,
    /// `freshness / received`, zero when nothing was received.
    pub freshness_per_received: f64,
    /// `duplicate / received`, zero when nothing was received.
    pub duplicate_per_received: f64,
}

/// The complete set of named scalars produced at finalization.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Messages entering the pipeline.
    pub received: u64,
    /// Messages forwarded to the sink.
    pub accepted: u64,
    /// Drops attributed to MAC verification.
    pub dropped_mac: u64,
    /// Drops attributed to freshness (stale or replayed sequence).
    pub dropped_replay: u64,
    /// Drops attributed to duplicate suppression.
    pub dropped_duplicate: u64,
    /// Drops attributed to an exhausted energy budget.
    pub dropped_energy: u64,
    /// `accepted / elapsed_seconds`, zero on a zero-length run.
    pub goodput_per_s: f64,
    /// Total energy spent.
    pub energy_consumed_mj: f64,
    /// Balance left at run end.
    pub energy_remaining_mj: f64,
    /// `consumed / accepted`, zero when nothing was accepted.
    pub energy_per_accepted_mj: f64,
    /// Messages for which the verification cost was charged.
    pub verify_attempts: u64,
    /// Backend the run used: "set", "bloom", or "sbf".
    pub duplicate_method: String,
    /// Membership `test` calls.
    pub membership_queries: u64,
    /// Membership `insert` calls.
    pub membership_inserts: u64,
    /// Queries that hit despite ground truth never seeing the id.
    pub membership_false_positives: u64,
    /// `false_positives / queries`, zero when nothing was queried.
    pub false_positive_rate: f64,
    /// Per-stage evaluation counts.
    pub stage_work: StageWork,
    /// The resolved stage order, 1-6 (see the configuration module).
    pub stage_order_id: u8,
    /// Set when `received != accepted + sum(drops)`: a bookkeeping defect,
    /// surfaced but never fatal.
    pub accounting_mismatch: bool,
}

impl RunReport {
    /// Sum of all drop counters.
    pub fn dropped_total(&self) -> u64 {
        self.dropped_mac + self.dropped_replay + self.dropped_duplicate + self.dropped_energy
    }
}
