//! # Shared Types Crate
//!
//! Cross-subsystem domain entities and time types for EdgeGuard.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Every type that crosses a crate boundary is
//!   defined here, once.
//! - **Immutable Messages**: A [`TelemetryMessage`] is never mutated after it
//!   enters the admission pipeline; it is forwarded unchanged or discarded.
//! - **Simulated Time**: All timestamps are [`SimTime`] microseconds since run
//!   start. Wall-clock time never appears in domain logic.

pub mod entities;
pub mod time;

pub use entities::TelemetryMessage;
pub use time::{SimDuration, SimTime};
