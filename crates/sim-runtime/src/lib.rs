//! # EdgeGuard Simulation Runtime
//!
//! The discrete-event substrate and the traffic collaborators around the
//! gateway.
//!
//! ## Modular Structure
//!
//! - `scheduler` - simulated-time event queue with idempotent cancellation
//! - `sensor` - benign telemetry sources with genuine CMAC tags
//! - `attacker` - replay / MITM adversary tapping the sensor channel
//! - `cloud` - upstream sink recording end-to-end delay
//! - `runtime` - configuration loading, wiring, and the run loop
//!
//! ## Concurrency Model
//!
//! Single-threaded and event-driven: the run loop pops one event at a time
//! and processes it to completion. All state is owned by the [`Simulation`];
//! no locking, no atomics, no wall-clock time.

pub mod attacker;
pub mod cloud;
pub mod runtime;
pub mod scheduler;
pub mod sensor;

pub use attacker::{AttackMode, AttackNode};
pub use cloud::CloudSink;
pub use runtime::{load_config, SimConfig, SimOutcome, Simulation};
pub use scheduler::{EventId, EventQueue};
pub use sensor::SensorNode;
