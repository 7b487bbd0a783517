//! Gateway configuration and one-time resolution.
//!
//! Malformed values (bad key hex, unknown stage letters, out-of-range order
//! ids) are recovered locally with a safe default and a logged diagnostic,
//! never a hard error: a run must complete to produce comparative statistics.
//! The stage order is resolved into a fixed array at construction time; the
//! per-message path never re-parses configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

use eg_membership::MembershipConfig;
use shared_crypto::MacKey;
use shared_types::SimDuration;

/// One admission check in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// MAC tag verification (letter `H`).
    Mac,
    /// Freshness / anti-replay windowing (letter `F`).
    Freshness,
    /// Duplicate suppression via the membership structure (letter `B`).
    Duplicate,
}

impl Stage {
    /// The default evaluation order: MAC, then freshness, then duplicate.
    pub const DEFAULT_ORDER: [Stage; 3] = [Stage::Mac, Stage::Freshness, Stage::Duplicate];

    /// Configuration letter for this stage.
    pub fn letter(self) -> char {
        match self {
            Stage::Mac => 'H',
            Stage::Freshness => 'F',
            Stage::Duplicate => 'B',
        }
    }

    /// Dense index for per-stage counters.
    pub(crate) fn index(self) -> usize {
        match self {
            Stage::Mac => 0,
            Stage::Freshness => 1,
            Stage::Duplicate => 2,
        }
    }
}

/// The six permutations of (MAC, Freshness, Duplicate), indexed 1-6.
const ORDER_TABLE: [[Stage; 3]; 6] = [
    [Stage::Mac, Stage::Freshness, Stage::Duplicate], // 1: HFB
    [Stage::Mac, Stage::Duplicate, Stage::Freshness], // 2: HBF
    [Stage::Freshness, Stage::Mac, Stage::Duplicate], // 3: FHB
    [Stage::Freshness, Stage::Duplicate, Stage::Mac], // 4: FBH
    [Stage::Duplicate, Stage::Mac, Stage::Freshness], // 5: BHF
    [Stage::Duplicate, Stage::Freshness, Stage::Mac], // 6: BFH
];

/// Map a resolved order back to its 1-6 identifier for the run report.
pub fn stage_order_id(order: &[Stage; 3]) -> u8 {
    ORDER_TABLE
        .iter()
        .position(|candidate| candidate == order)
        .map(|idx| idx as u8 + 1)
        .unwrap_or(0)
}

/// Normalize a stage-order string over the alphabet {H, F, B}.
///
/// Duplicate letters are ignored, unknown characters are dropped with a
/// diagnostic, and missing letters are appended in the default H, F, B
/// order.
fn parse_stage_order(text: &str) -> [Stage; 3] {
    let mut order: Vec<Stage> = Vec::with_capacity(3);
    for ch in text.chars() {
        let stage = match ch.to_ascii_uppercase() {
            'H' => Stage::Mac,
            'F' => Stage::Freshness,
            'B' => Stage::Duplicate,
            other => {
                warn!(letter = %other, "unknown stage letter ignored");
                continue;
            }
        };
        if !order.contains(&stage) {
            order.push(stage);
        }
    }
    for stage in Stage::DEFAULT_ORDER {
        if !order.contains(&stage) {
            order.push(stage);
        }
    }
    [order[0], order[1], order[2]]
}

/// Resolve the configured stage order.
///
/// The numeric id (1-6) takes precedence over the string form when both are
/// given; an out-of-range id falls back to the string, and an absent/empty
/// string yields the default order.
pub fn resolve_stage_order(order_id: Option<u8>, order_text: Option<&str>) -> [Stage; 3] {
    if let Some(id) = order_id {
        if (1..=6).contains(&id) {
            return ORDER_TABLE[(id - 1) as usize];
        }
        warn!(stage_order_id = id, "stage order id out of range 1-6, ignoring");
    }
    match order_text {
        Some(text) => parse_stage_order(text),
        None => Stage::DEFAULT_ORDER,
    }
}

/// Complete gateway configuration, immutable for the run once resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Initial battery capacity in millijoules.
    pub battery_init_mj: f64,
    /// Energy charged per forwarded message.
    pub cost_forward_mj: f64,
    /// Energy charged per verification attempt.
    pub cost_verify_mj: f64,
    /// Master switch: disabled means no checks run and no verify cost.
    pub security_enabled: bool,
    /// Ablation switch for the MAC stage.
    pub check_mac: bool,
    /// Ablation switch for the freshness stage.
    pub check_freshness: bool,
    /// Ablation switch for the duplicate stage.
    pub check_duplicate: bool,
    /// Freshness time window; maps to a per-source message-count window.
    pub freshness_window: SimDuration,
    /// Fixed processing delay before a forwarded message reaches the sink.
    pub proc_delay: SimDuration,
    /// Stage order as a string over {H, F, B}; see [`resolve_stage_order`].
    pub stage_order: Option<String>,
    /// Stage order as a numeric id 1-6; wins over the string form.
    pub stage_order_id: Option<u8>,
    /// MAC key as 32 hex characters; invalid input recovers to the all-zero
    /// key with a diagnostic.
    pub aes_key_hex: String,
    /// Duplicate-detection structure selection and sizing.
    pub membership: MembershipConfig,
    /// Seed for the structure's aging randomness (reproducible runs).
    pub rng_seed: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            battery_init_mj: 5000.0,
            cost_forward_mj: 5.0,
            cost_verify_mj: 5.0,
            security_enabled: true,
            check_mac: true,
            check_freshness: true,
            check_duplicate: true,
            freshness_window: SimDuration::from_secs_f64(1.0),
            proc_delay: SimDuration::ZERO,
            stage_order: None,
            stage_order_id: None,
            aes_key_hex: "000102030405060708090a0b0c0d0e0f".to_string(),
            membership: MembershipConfig::default(),
            rng_seed: 1,
        }
    }
}

impl GatewayConfig {
    /// Resolve the stage order once, for construction time.
    pub fn resolved_stages(&self) -> [Stage; 3] {
        resolve_stage_order(self.stage_order_id, self.stage_order.as_deref())
    }

    /// Parse the configured key, recovering to the all-zero key on any
    /// malformed input.
    pub fn resolved_key(&self) -> MacKey {
        match MacKey::from_hex(&self.aes_key_hex) {
            Ok(key) => key,
            Err(err) => {
                warn!(error = %err, "invalid MAC key hex, falling back to all-zero key");
                MacKey::zero()
            }
        }
    }
}
