//! Per-source sliding-window replay detection over sequence numbers.
//!
//! Each source gets a 64-bit window anchored at the highest sequence seen.
//! The window size in messages is re-derived on every arrival from the
//! configured freshness *time* window divided by the source's exponentially
//! smoothed inter-arrival period, so a fixed time window maps to a variable
//! message-count window that adapts to each source's observed send rate.
//!
//! INVARIANT: `window_mask` only ever records sequences within
//! `[max_sequence - 63, max_sequence]`; bit `i` set means sequence
//! `max_sequence - i` was seen.

use std::collections::HashMap;

use shared_types::{SimDuration, SimTime};

/// Hard cap on the message-count window (the mask width).
pub const MAX_WINDOW_MSGS: u32 = 64;

/// Smoothing: `avg = 0.9 * avg + 0.1 * observed`.
const EMA_KEEP: f64 = 0.9;
const EMA_GAIN: f64 = 0.1;

/// Periods at or below this (microseconds) are noise and do not update the
/// average; also the floor of the window divisor, avoiding division blow-up.
const PERIOD_EPSILON_US: f64 = 1.0;

/// Outcome of one freshness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessVerdict {
    /// Admit: sequence advances the window or lands on an unseen slot.
    Fresh,
    /// Reject: sequence fell behind the adaptive window.
    OutOfWindow,
    /// Reject: sequence already recorded inside the window.
    DuplicateSequence,
}

impl FreshnessVerdict {
    /// Whether the message passes the freshness stage.
    pub fn is_fresh(self) -> bool {
        matches!(self, FreshnessVerdict::Fresh)
    }
}

/// Window state for one source; created on first sight, never destroyed for
/// the run's lifetime.
#[derive(Debug)]
struct FreshnessState {
    max_sequence: u64,
    window_mask: u64,
    last_arrival: Option<SimTime>,
    average_period_us: f64,
    window_msgs: u32,
}

impl FreshnessState {
    fn new() -> Self {
        Self {
            max_sequence: 0,
            window_mask: 0,
            last_arrival: None,
            average_period_us: 0.0,
            window_msgs: MAX_WINDOW_MSGS,
        }
    }
}

/// Replay detector over all sources, keyed by source id.
#[derive(Debug)]
pub struct FreshnessTracker {
    window: SimDuration,
    states: HashMap<i32, FreshnessState>,
}

impl FreshnessTracker {
    /// Create a tracker for the given freshness time window.
    pub fn new(window: SimDuration) -> Self {
        Self {
            window,
            states: HashMap::new(),
        }
    }

    /// Check one arrival and record it when fresh.
    pub fn check_and_update(&mut self, source: i32, sequence: u64, now: SimTime) -> FreshnessVerdict {
        let state = self.states.entry(source).or_insert_with(FreshnessState::new);

        // Learn the source's send rate from observed inter-arrival gaps.
        if let Some(last) = state.last_arrival {
            let period_us = (now - last).as_micros() as f64;
            if period_us > PERIOD_EPSILON_US {
                state.average_period_us = EMA_KEEP * state.average_period_us + EMA_GAIN * period_us;
            }
        }
        state.last_arrival = Some(now);

        // Fixed time window -> adaptive message-count window.
        let divisor = state.average_period_us.max(PERIOD_EPSILON_US);
        let window_msgs = (self.window.as_micros() as f64 / divisor).ceil();
        state.window_msgs = if window_msgs >= MAX_WINDOW_MSGS as f64 {
            MAX_WINDOW_MSGS
        } else {
            (window_msgs as u32).max(1)
        };

        if sequence > state.max_sequence {
            let shift = sequence - state.max_sequence;
            // A jump of 64 or more ages out the entire recorded history.
            state.window_mask = if shift >= 64 { 0 } else { state.window_mask << shift };
            state.window_mask |= 1;
            state.max_sequence = sequence;
            return FreshnessVerdict::Fresh;
        }

        let delta = state.max_sequence - sequence;
        if delta >= u64::from(state.window_msgs) {
            FreshnessVerdict::OutOfWindow
        } else if state.window_mask >> delta & 1 == 1 {
            FreshnessVerdict::DuplicateSequence
        } else {
            state.window_mask |= 1 << delta;
            FreshnessVerdict::Fresh
        }
    }

    /// Number of sources seen so far.
    pub fn sources_tracked(&self) -> usize {
        self.states.len()
    }
}
