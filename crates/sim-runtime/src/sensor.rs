//! Benign telemetry sources.
//!
//! Each sensor owns a monotone sequence counter, an id namespace offset by
//! its index, its own battery, and the shared MAC key. A depleted sensor
//! simply stops emitting; it is never an error.

use rand::Rng;
use tracing::debug;

use shared_crypto::{compute_tag, hex_encode, pack_id_timestamp, MacKey};
use shared_types::{SimDuration, SimTime, TelemetryMessage};

/// Spacing between the id namespaces of adjacent sensors.
const ID_NAMESPACE_STRIDE: i64 = 100_000;

/// Send cadence jitter: the next emission lands `[0.9, 1.1)` s away.
const INTERVAL_MIN_S: f64 = 0.9;
const INTERVAL_MAX_S: f64 = 1.1;

/// First emission lands `[0.5, 1.5)` s into the run.
const INITIAL_MIN_S: f64 = 0.5;
const INITIAL_MAX_S: f64 = 1.5;

/// One telemetry source.
#[derive(Debug)]
pub struct SensorNode {
    source: i32,
    base_offset: i64,
    next_sequence: u64,
    battery_mj: f64,
    cost_per_message_mj: f64,
    key: MacKey,
}

impl SensorNode {
    /// Create sensor number `index` (zero-based) holding the shared key.
    pub fn new(index: usize, key: MacKey, battery_mj: f64, cost_per_message_mj: f64) -> Self {
        Self {
            source: index as i32,
            base_offset: (index as i64 + 1) * ID_NAMESPACE_STRIDE,
            next_sequence: 1,
            battery_mj,
            cost_per_message_mj,
            key,
        }
    }

    /// Emit the next message, or `None` once the battery cannot cover a send.
    pub fn emit(&mut self, now: SimTime) -> Option<TelemetryMessage> {
        if self.battery_mj < self.cost_per_message_mj {
            debug!(source = self.source, "sensor battery depleted, going silent");
            return None;
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        let id = self.base_offset + sequence as i64;
        let timestamp_us = now.as_micros() as i64;

        let tag = compute_tag(&self.key, &pack_id_timestamp(id as i32, timestamp_us));
        self.battery_mj -= self.cost_per_message_mj;

        Some(TelemetryMessage {
            id,
            source: self.source,
            sequence,
            mac_hex: hex_encode(&tag),
            timestamp_us,
        })
    }

    /// Jittered offset of the first emission.
    pub fn initial_delay(rng: &mut impl Rng) -> SimDuration {
        SimDuration::from_secs_f64(rng.gen_range(INITIAL_MIN_S..INITIAL_MAX_S))
    }

    /// Jittered gap to the next emission.
    pub fn next_interval(rng: &mut impl Rng) -> SimDuration {
        SimDuration::from_secs_f64(rng.gen_range(INTERVAL_MIN_S..INTERVAL_MAX_S))
    }

    /// Source identifier.
    pub fn source(&self) -> i32 {
        self.source
    }

    /// Battery left, for the end-of-run report.
    pub fn battery_remaining_mj(&self) -> f64 {
        self.battery_mj
    }
}
