//! Configuration loading and the simulation run loop.
//!
//! Configuration starts from coded defaults (the reference scenario: three
//! sensors, a replay attacker, a 5000 mJ gateway battery) and is overridden
//! from `EG_*` environment variables. Unparseable values are ignored with a
//! diagnostic, never fatal.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use eg_gateway::{Admission, Gateway, GatewayConfig, RunReport};
use eg_membership::DuplicateMethod;
use shared_types::{SimDuration, SimTime, TelemetryMessage};

use crate::attacker::{AttackMode, AttackNode, AttackReport};
use crate::cloud::{CloudReport, CloudSink};
use crate::scheduler::{EventId, EventQueue};
use crate::sensor::SensorNode;

/// First attack lands `[2, 3)` s into the run.
const ATTACK_INITIAL_MIN_S: f64 = 2.0;
const ATTACK_INITIAL_MAX_S: f64 = 3.0;

/// Complete simulation configuration.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Simulated run length.
    pub duration: SimDuration,
    /// Number of benign sensors.
    pub sensors: usize,
    /// Per-sensor battery capacity in millijoules.
    pub sensor_battery_mj: f64,
    /// Per-message sensor send cost.
    pub sensor_cost_mj: f64,
    /// Whether the adversary is active.
    pub attack_enabled: bool,
    /// Adversary strategy.
    pub attack_mode: AttackMode,
    /// Gap between attack injections.
    pub attack_interval: SimDuration,
    /// Master seed for traffic jitter and forged tags.
    pub seed: u64,
    /// The gateway under test.
    pub gateway: GatewayConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            duration: SimDuration::from_secs_f64(120.0),
            sensors: 3,
            sensor_battery_mj: 5000.0,
            sensor_cost_mj: 20.0,
            attack_enabled: true,
            attack_mode: AttackMode::Replay,
            attack_interval: SimDuration::from_secs_f64(2.5),
            seed: 42,
            gateway: GatewayConfig::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "unparseable environment value ignored");
            None
        }
    }
}

fn env_bool(name: &str) -> Option<bool> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            warn!(var = name, value = other, "unrecognized boolean ignored");
            None
        }
    }
}

fn env_secs(name: &str) -> Option<SimDuration> {
    env_parse::<f64>(name).map(SimDuration::from_secs_f64)
}

/// Build the configuration from defaults plus `EG_*` environment overrides.
pub fn load_config() -> SimConfig {
    let mut config = SimConfig::default();

    if let Some(v) = env_secs("EG_SIM_DURATION_S") {
        config.duration = v;
    }
    if let Some(v) = env_parse("EG_SENSORS") {
        config.sensors = v;
    }
    if let Some(v) = env_parse("EG_SENSOR_BATTERY_MJ") {
        config.sensor_battery_mj = v;
    }
    if let Some(v) = env_parse("EG_SENSOR_COST_MJ") {
        config.sensor_cost_mj = v;
    }
    if let Some(v) = env_bool("EG_ATTACK_ENABLED") {
        config.attack_enabled = v;
    }
    if let Ok(v) = std::env::var("EG_ATTACK_MODE") {
        config.attack_mode = AttackMode::parse_lossy(&v);
    }
    if let Some(v) = env_secs("EG_ATTACK_INTERVAL_S") {
        config.attack_interval = v;
    }
    if let Some(v) = env_parse("EG_SEED") {
        config.seed = v;
    }

    let gw = &mut config.gateway;
    if let Some(v) = env_parse("EG_BATTERY_INIT_MJ") {
        gw.battery_init_mj = v;
    }
    if let Some(v) = env_parse("EG_COST_FORWARD_MJ") {
        gw.cost_forward_mj = v;
    }
    if let Some(v) = env_parse("EG_COST_VERIFY_MJ") {
        gw.cost_verify_mj = v;
    }
    if let Some(v) = env_bool("EG_SECURITY_ENABLED") {
        gw.security_enabled = v;
    }
    if let Some(v) = env_bool("EG_CHECK_HMAC") {
        gw.check_mac = v;
    }
    if let Some(v) = env_bool("EG_CHECK_FRESHNESS") {
        gw.check_freshness = v;
    }
    if let Some(v) = env_bool("EG_CHECK_DUPLICATE") {
        gw.check_duplicate = v;
    }
    if let Some(v) = env_secs("EG_HMAC_WINDOW_S") {
        gw.freshness_window = v;
    }
    if let Some(v) = env_secs("EG_PROC_DELAY_S") {
        gw.proc_delay = v;
    }
    if let Ok(v) = std::env::var("EG_STAGE_ORDER") {
        gw.stage_order = Some(v);
    }
    if let Some(v) = env_parse("EG_STAGE_ORDER_ID") {
        gw.stage_order_id = Some(v);
    }
    if let Ok(v) = std::env::var("EG_AES_KEY_HEX") {
        gw.aes_key_hex = v;
    }
    if let Ok(v) = std::env::var("EG_DUPLICATE_METHOD") {
        gw.membership.method = DuplicateMethod::parse_lossy(&v);
    }
    if let Some(v) = env_parse("EG_BLOOM_BITS") {
        gw.membership.bloom_bits = v;
    }
    if let Some(v) = env_parse("EG_BLOOM_HASHES") {
        gw.membership.bloom_hashes = v;
    }
    if let Some(v) = env_parse("EG_SBF_BITS") {
        gw.membership.sbf_bits = v;
    }
    if let Some(v) = env_parse("EG_SBF_HASHES") {
        gw.membership.sbf_hashes = v;
    }
    if let Some(v) = env_parse("EG_SBF_DECAY") {
        gw.membership.sbf_decay = v;
    }
    gw.rng_seed = config.seed;

    config
}

/// All end-of-run scalars, one section per node.
#[derive(Debug, Clone, Serialize)]
pub struct SimOutcome {
    /// Gateway pipeline accounting.
    pub gateway: RunReport,
    /// Sink delivery and delay statistics.
    pub cloud: CloudReport,
    /// Adversary statistics, absent when the attacker was disabled.
    pub attacker: Option<AttackReport>,
    /// Per-sensor battery left at run end.
    pub sensor_battery_remaining_mj: Vec<f64>,
}

/// One scheduled occurrence in the run.
enum Event {
    /// A sensor's send timer fired.
    SensorEmit(usize),
    /// The adversary's injection timer fired.
    AttackEmit,
    /// A message reached the gateway input.
    GatewayDeliver(TelemetryMessage),
    /// A forwarded message reached the sink.
    CloudDeliver(TelemetryMessage),
}

/// The wired-up simulation: scheduler plus every node, owned exclusively.
pub struct Simulation {
    queue: EventQueue<Event>,
    gateway: Gateway,
    sensors: Vec<SensorNode>,
    attacker: Option<AttackNode>,
    attack_interval: SimDuration,
    attack_timer: Option<EventId>,
    cloud: CloudSink,
    rng: SmallRng,
    horizon: SimTime,
}

impl Simulation {
    /// Wire up all nodes and schedule their first timers.
    pub fn new(config: &SimConfig) -> Self {
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut queue = EventQueue::new();
        let key = config.gateway.resolved_key();

        let sensors: Vec<SensorNode> = (0..config.sensors)
            .map(|idx| {
                SensorNode::new(idx, key.clone(), config.sensor_battery_mj, config.sensor_cost_mj)
            })
            .collect();
        for idx in 0..sensors.len() {
            let delay = SensorNode::initial_delay(&mut rng);
            queue.schedule_at(SimTime::ZERO + delay, Event::SensorEmit(idx));
        }

        let mut attack_timer = None;
        let attacker = if config.attack_enabled {
            let first = SimDuration::from_secs_f64(
                rng.gen_range(ATTACK_INITIAL_MIN_S..ATTACK_INITIAL_MAX_S),
            );
            attack_timer = Some(queue.schedule_at(SimTime::ZERO + first, Event::AttackEmit));
            Some(AttackNode::new(config.attack_mode))
        } else {
            None
        };

        Self {
            queue,
            gateway: Gateway::new(&config.gateway),
            sensors,
            attacker,
            attack_interval: config.attack_interval,
            attack_timer,
            cloud: CloudSink::new(),
            rng,
            horizon: SimTime::ZERO + config.duration,
        }
    }

    /// Run to the configured horizon and finalize every node.
    pub fn run(&mut self) -> SimOutcome {
        while let Some((now, event)) = self.queue.pop() {
            if now > self.horizon {
                break;
            }
            self.handle(now, event);
        }

        // Withdraw the still-pending attack timer; cancel is idempotent, so
        // finalizing a run whose timer already fired (or was never armed) is
        // safe.
        if let Some(timer) = self.attack_timer.take() {
            self.queue.cancel(timer);
        }

        let elapsed = self.horizon - SimTime::ZERO;
        let outcome = SimOutcome {
            gateway: self.gateway.finalize(elapsed),
            cloud: self.cloud.report(),
            attacker: self.attacker.as_ref().map(AttackNode::report),
            sensor_battery_remaining_mj: self
                .sensors
                .iter()
                .map(SensorNode::battery_remaining_mj)
                .collect(),
        };
        info!(
            received = outcome.gateway.received,
            accepted = outcome.gateway.accepted,
            dropped = outcome.gateway.dropped_total(),
            energy_remaining_mj = outcome.gateway.energy_remaining_mj,
            "run complete"
        );
        outcome
    }

    fn handle(&mut self, now: SimTime, event: Event) {
        match event {
            Event::SensorEmit(idx) => {
                if let Some(msg) = self.sensors[idx].emit(now) {
                    // The adversary taps the channel on its way past.
                    if let Some(attacker) = &mut self.attacker {
                        attacker.observe(&msg);
                    }
                    self.queue.schedule_at(now, Event::GatewayDeliver(msg));

                    let gap = SensorNode::next_interval(&mut self.rng);
                    self.queue.schedule_after(gap, Event::SensorEmit(idx));
                }
                // A depleted sensor schedules nothing further.
            }
            Event::AttackEmit => {
                let Some(attacker) = &mut self.attacker else {
                    return;
                };
                if let Some(msg) = attacker.forge(now, &mut self.rng) {
                    self.queue.schedule_at(now, Event::GatewayDeliver(msg));
                }
                self.attack_timer =
                    Some(self.queue.schedule_after(self.attack_interval, Event::AttackEmit));
            }
            Event::GatewayDeliver(msg) => {
                if let Admission::Forwarded = self.gateway.admit(&msg, now) {
                    let delay = self.gateway.proc_delay();
                    self.queue.schedule_after(delay, Event::CloudDeliver(msg));
                }
            }
            Event::CloudDeliver(msg) => {
                self.cloud.accept(&msg, now);
            }
        }
    }
}
