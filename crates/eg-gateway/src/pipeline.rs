//! The admission pipeline: per-message state machine from receipt to
//! forward-or-drop, with energy charging and drop attribution.
//!
//! Per message: `Received -> EnergyChecked -> StageEvaluating(i).. ->
//! Admitted | Dropped(reason)`. The first failing stage owns the drop; later
//! stages never run for that message, so per-stage work counters reflect
//! exactly the stages evaluated under the configured order.
//!
//! All state here is owned by one gateway instance, constructed fresh per
//! run; messages are processed to completion one at a time.

use tracing::{debug, error};

use eg_membership::{DuplicateStore, ExactSet, MembershipMetrics};
use shared_crypto::{hex_decode, pack_id_timestamp, verify_tag, MacKey};
use shared_types::{SimDuration, SimTime, TelemetryMessage};

use crate::config::{stage_order_id, GatewayConfig, Stage};
use crate::domain::energy::EnergyBudget;
use crate::domain::freshness::FreshnessTracker;
use crate::report::{RunReport, StageWork};

/// Why a message was not forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Balance could not cover the minimum cost; nothing was charged.
    EnergyExhausted,
    /// Tag absent, malformed, or failed verification.
    MacFailure,
    /// Stale or replayed sequence number.
    StaleReplay,
    /// Identifier already (probably) seen.
    Duplicate,
}

/// Outcome of one admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// All enabled checks passed; forward after the configured delay.
    Forwarded,
    /// Dropped, attributed to one reason.
    Dropped(DropReason),
}

#[derive(Debug, Default)]
struct Counters {
    received: u64,
    accepted: u64,
    dropped_mac: u64,
    dropped_replay: u64,
    dropped_duplicate: u64,
    dropped_energy: u64,
    verify_attempts: u64,
    stage_work: [u64; 3],
}

/// One gateway instance: resolved configuration plus all per-run state.
#[derive(Debug)]
pub struct Gateway {
    stages: [Stage; 3],
    security_enabled: bool,
    check_mac: bool,
    check_freshness: bool,
    check_duplicate: bool,
    cost_forward_mj: f64,
    cost_verify_mj: f64,
    proc_delay: SimDuration,
    key: MacKey,
    energy: EnergyBudget,
    freshness: FreshnessTracker,
    store: DuplicateStore,
    store_metrics: MembershipMetrics,
    /// Authoritative record of admitted ids, kept purely to measure the
    /// probabilistic store's false positives; never consulted for admission.
    ground_truth: ExactSet,
    counters: Counters,
}

impl Gateway {
    /// Build a gateway from configuration, resolving the stage order, key,
    /// and membership structure exactly once.
    pub fn new(config: &GatewayConfig) -> Self {
        let membership = config.membership.clone().normalized();
        Self {
            stages: config.resolved_stages(),
            security_enabled: config.security_enabled,
            check_mac: config.check_mac,
            check_freshness: config.check_freshness,
            check_duplicate: config.check_duplicate,
            cost_forward_mj: config.cost_forward_mj,
            cost_verify_mj: config.cost_verify_mj,
            proc_delay: config.proc_delay,
            key: config.resolved_key(),
            energy: EnergyBudget::new(config.battery_init_mj),
            freshness: FreshnessTracker::new(config.freshness_window),
            store: DuplicateStore::from_config(&membership, config.rng_seed),
            store_metrics: MembershipMetrics::new(),
            ground_truth: ExactSet::new(),
            counters: Counters::default(),
        }
    }

    /// Run one message through the pipeline.
    pub fn admit(&mut self, msg: &TelemetryMessage, now: SimTime) -> Admission {
        self.counters.received += 1;

        // Refuse outright when the balance cannot cover the minimum cost.
        let minimum_mj =
            self.cost_forward_mj + if self.security_enabled { self.cost_verify_mj } else { 0.0 };
        if !self.energy.can_afford(minimum_mj) {
            self.counters.dropped_energy += 1;
            debug!(
                id = msg.id,
                remaining_mj = self.energy.remaining_mj(),
                "battery depleted, dropping message"
            );
            return Admission::Dropped(DropReason::EnergyExhausted);
        }

        if self.security_enabled {
            // One verify charge per message, however the stages resolve.
            self.energy.charge(self.cost_verify_mj);
            self.counters.verify_attempts += 1;

            for stage in self.stages {
                if !self.stage_enabled(stage) {
                    continue;
                }
                self.counters.stage_work[stage.index()] += 1;

                let passed = match stage {
                    Stage::Mac => self.mac_stage_passes(msg),
                    Stage::Freshness => self
                        .freshness
                        .check_and_update(msg.source, msg.sequence, now)
                        .is_fresh(),
                    Stage::Duplicate => {
                        let hit = self.store.test(msg.id);
                        self.store_metrics
                            .record_query(msg.id, hit, self.ground_truth.test(msg.id));
                        !hit
                    }
                };

                if !passed {
                    let reason = Self::drop_reason_for(stage);
                    match reason {
                        DropReason::MacFailure => self.counters.dropped_mac += 1,
                        DropReason::StaleReplay => self.counters.dropped_replay += 1,
                        DropReason::Duplicate => self.counters.dropped_duplicate += 1,
                        DropReason::EnergyExhausted => unreachable!("stages never drop for energy"),
                    }
                    debug!(
                        id = msg.id,
                        source = msg.source,
                        sequence = msg.sequence,
                        stage = %stage.letter(),
                        "check failed, dropping message"
                    );
                    return Admission::Dropped(reason);
                }
            }
        }

        // Ground truth records every admitted id for measurement; the active
        // structure only when duplicate suppression is in play.
        self.ground_truth.insert(msg.id);
        if self.check_duplicate {
            self.store.insert(msg.id);
            self.store_metrics.record_insert(msg.id);
        }

        self.energy.charge(self.cost_forward_mj);
        self.counters.accepted += 1;
        debug!(id = msg.id, source = msg.source, "message admitted");
        Admission::Forwarded
    }

    /// MAC stage: absent tag fails without computing; malformed hex is a
    /// verification failure, not an error.
    fn mac_stage_passes(&self, msg: &TelemetryMessage) -> bool {
        if !msg.has_tag() {
            return false;
        }
        let tag = match hex_decode(&msg.mac_hex) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(id = msg.id, error = %err, "malformed MAC hex treated as verification failure");
                return false;
            }
        };
        let input = pack_id_timestamp(msg.id as i32, msg.timestamp_us);
        verify_tag(&self.key, &input, &tag)
    }

    fn stage_enabled(&self, stage: Stage) -> bool {
        match stage {
            Stage::Mac => self.check_mac,
            Stage::Freshness => self.check_freshness,
            Stage::Duplicate => self.check_duplicate,
        }
    }

    fn drop_reason_for(stage: Stage) -> DropReason {
        match stage {
            Stage::Mac => DropReason::MacFailure,
            Stage::Freshness => DropReason::StaleReplay,
            Stage::Duplicate => DropReason::Duplicate,
        }
    }

    /// Fixed delay applied between admission and sink delivery.
    pub fn proc_delay(&self) -> SimDuration {
        self.proc_delay
    }

    /// Current energy state (read-only).
    pub fn energy(&self) -> &EnergyBudget {
        &self.energy
    }

    /// Produce the end-of-run report and verify the accounting invariant.
    ///
    /// A mismatch marks a logic defect in the pipeline's bookkeeping; it
    /// fails the test suite but never aborts a run.
    pub fn finalize(&self, elapsed: SimDuration) -> RunReport {
        let c = &self.counters;
        let dropped_total =
            c.dropped_mac + c.dropped_replay + c.dropped_duplicate + c.dropped_energy;
        let accounting_mismatch = c.received != c.accepted + dropped_total;
        if accounting_mismatch {
            error!(
                received = c.received,
                accepted = c.accepted,
                dropped_total,
                "accounting invariant violated: received != accepted + dropped"
            );
        }

        let per_received = |count: u64| -> f64 {
            if c.received == 0 {
                0.0
            } else {
                count as f64 / c.received as f64
            }
        };

        let elapsed_s = elapsed.as_secs_f64();
        RunReport {
            received: c.received,
            accepted: c.accepted,
            dropped_mac: c.dropped_mac,
            dropped_replay: c.dropped_replay,
            dropped_duplicate: c.dropped_duplicate,
            dropped_energy: c.dropped_energy,
            goodput_per_s: if elapsed_s > 0.0 {
                c.accepted as f64 / elapsed_s
            } else {
                0.0
            },
            energy_consumed_mj: self.energy.consumed_mj(),
            energy_remaining_mj: self.energy.remaining_mj(),
            energy_per_accepted_mj: if c.accepted > 0 {
                self.energy.consumed_mj() / c.accepted as f64
            } else {
                0.0
            },
            verify_attempts: c.verify_attempts,
            duplicate_method: self.store.method().as_str().to_string(),
            membership_queries: self.store_metrics.queries(),
            membership_inserts: self.store_metrics.inserts(),
            membership_false_positives: self.store_metrics.false_positives(),
            false_positive_rate: self.store_metrics.false_positive_rate(),
            stage_work: StageWork {
                mac: c.stage_work[Stage::Mac.index()],
                freshness: c.stage_work[Stage::Freshness.index()],
                duplicate: c.stage_work[Stage::Duplicate.index()],
                mac_per_received: per_received(c.stage_work[Stage::Mac.index()]),
                freshness_per_received: per_received(c.stage_work[Stage::Freshness.index()]),
                duplicate_per_received: per_received(c.stage_work[Stage::Duplicate.index()]),
            },
            stage_order_id: stage_order_id(&self.stages),
            accounting_mismatch,
        }
    }
}
