//! # Core Domain Entities
//!
//! The telemetry message exchanged between sensors, the gateway, and the
//! cloud sink.

use serde::{Deserialize, Serialize};

/// A single telemetry message as emitted by a sensor (or forged by an
/// adversary) and consumed by the gateway.
///
/// The message identity (`id`) is attacker-guessable and MUST NOT be trusted
/// as a freshness signal; `(source, sequence)` is the trustworthy ordering
/// key. Once admitted to the pipeline a message is immutable: it is either
/// forwarded unchanged to the sink or discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryMessage {
    /// Globally unique message identifier (sensor-assigned, guessable).
    pub id: i64,
    /// Originating sensor identifier.
    pub source: i32,
    /// Per-source monotone sequence number.
    pub sequence: u64,
    /// AES-128-CMAC tag as lowercase hex; empty when no tag is carried.
    pub mac_hex: String,
    /// Origin timestamp in simulated microseconds.
    pub timestamp_us: i64,
}

impl TelemetryMessage {
    /// Whether the message carries a MAC tag at all.
    ///
    /// An absent tag is distinct from a malformed one: both fail MAC
    /// verification, but an absent tag fails without computing anything.
    pub fn has_tag(&self) -> bool {
        !self.mac_hex.is_empty()
    }
}
