//! # EdgeGuard Gateway
//!
//! The admission pipeline: an ordered sequence of security checks applied to
//! every inbound telemetry message under an energy budget.
//!
//! ## Architecture
//!
//! - **Configuration** (`config`): the full run-time surface: energy model,
//!   ablation switches, stage ordering (string or numeric id), key material,
//!   membership selection. Malformed values recover to safe defaults with a
//!   logged diagnostic; resolution happens once at construction, never in the
//!   per-message hot path.
//! - **Domain Layer** (`domain/`): pure state machines
//!   - `FreshnessTracker`: per-source sliding sequence windows sized
//!     adaptively from observed inter-arrival periods
//!   - `EnergyBudget`: monotonically decreasing balance in millijoules
//! - **Pipeline** (`pipeline`): the per-message state machine from energy
//!   gate through the configured stage order to first-failure drop
//!   attribution, registration, and forwarding
//! - **Report** (`report`): end-of-run scalars with the accounting-closure
//!   check
//!
//! ## Invariants
//!
//! - **Accounting closure**: `received == accepted + dropped_mac +
//!   dropped_replay + dropped_duplicate + dropped_energy` after every run
//! - **Single verify charge**: with security enabled, the verification cost
//!   is charged exactly once per message that passes the energy gate,
//!   regardless of how many stages run or how they resolve
//! - **First-failure attribution**: the first failing stage owns the drop;
//!   later stages never run for that message

pub mod config;
pub mod domain;
pub mod pipeline;
pub mod report;

// Re-exports for convenience
pub use config::{GatewayConfig, Stage};
pub use domain::energy::EnergyBudget;
pub use domain::freshness::{FreshnessTracker, FreshnessVerdict};
pub use pipeline::{Admission, DropReason, Gateway};
pub use report::RunReport;
