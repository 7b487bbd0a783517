//! Adversarial traffic: replay and man-in-the-middle forgeries.
//!
//! The attacker taps the sensor-to-gateway channel, remembering the last
//! genuine message it saw. In replay mode it re-submits that capture
//! verbatim: the tag is valid, but the sequence is stale and the id already
//! seen. In MITM mode it fabricates a message with a fresh id and a tag it
//! cannot compute without the key.

use rand::Rng;
use serde::Serialize;
use tracing::warn;

use shared_crypto::hex_encode;
use shared_types::{SimDuration, SimTime, TelemetryMessage};

/// Id namespace for fabricated messages, below every sensor's range.
const FORGED_ID_BASE: i64 = 1000;

/// Forged origin timestamps lag the current time by this much.
const FORGED_TIMESTAMP_LAG: SimDuration = SimDuration::from_micros(2_000_000);

/// Attack strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackMode {
    /// Re-submit a captured genuine message verbatim.
    Replay,
    /// Fabricate a message with a forged tag.
    Mitm,
}

impl AttackMode {
    /// Parse the numeric (1 = replay, 2 = mitm) or string form, falling back
    /// to replay on anything unrecognized.
    pub fn parse_lossy(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "1" | "replay" => AttackMode::Replay,
            "2" | "mitm" => AttackMode::Mitm,
            other => {
                warn!(mode = other, "unknown attack mode, falling back to replay");
                AttackMode::Replay
            }
        }
    }
}

/// End-of-run attacker scalars.
#[derive(Debug, Clone, Serialize)]
pub struct AttackReport {
    /// Strategy the run used.
    pub mode: AttackMode,
    /// Messages injected into the gateway channel.
    pub attacks_sent: u64,
}

/// The adversary node.
#[derive(Debug)]
pub struct AttackNode {
    mode: AttackMode,
    captured: Option<TelemetryMessage>,
    next_forged_id: i64,
    attacks_sent: u64,
}

impl AttackNode {
    /// Create an attacker with the given strategy.
    pub fn new(mode: AttackMode) -> Self {
        Self {
            mode,
            captured: None,
            next_forged_id: FORGED_ID_BASE,
            attacks_sent: 0,
        }
    }

    /// Observe a genuine message crossing the channel.
    pub fn observe(&mut self, msg: &TelemetryMessage) {
        self.captured = Some(msg.clone());
    }

    /// Produce the next attack message, or `None` when replay mode has
    /// nothing captured yet.
    pub fn forge(&mut self, now: SimTime, rng: &mut impl Rng) -> Option<TelemetryMessage> {
        let msg = match self.mode {
            AttackMode::Replay => self.captured.clone()?,
            AttackMode::Mitm => {
                let id = self.next_forged_id;
                self.next_forged_id += 1;

                // A tag the attacker cannot compute: random bytes.
                let mut fake_tag = [0u8; 16];
                rng.fill(&mut fake_tag[..]);

                let (source, sequence) = match &self.captured {
                    Some(seen) => (seen.source, seen.sequence + 1),
                    None => (0, 1),
                };
                TelemetryMessage {
                    id,
                    source,
                    sequence,
                    mac_hex: hex_encode(&fake_tag),
                    timestamp_us: (now - FORGED_TIMESTAMP_LAG).as_micros() as i64,
                }
            }
        };
        self.attacks_sent += 1;
        Some(msg)
    }

    /// Scalars for the end-of-run report.
    pub fn report(&self) -> AttackReport {
        AttackReport {
            mode: self.mode,
            attacks_sent: self.attacks_sent,
        }
    }
}
