//! Upstream sink: accepts forwarded messages and records end-to-end delay.

use serde::Serialize;
use tracing::debug;

use shared_types::{SimTime, TelemetryMessage};

/// End-of-run sink scalars.
#[derive(Debug, Clone, Serialize)]
pub struct CloudReport {
    /// Messages that reached the sink.
    pub received: u64,
    /// Sum of (arrival - origin) over all messages, in seconds.
    pub total_delay_s: f64,
    /// `total_delay / received`, zero when nothing arrived.
    pub avg_delay_s: f64,
}

/// The cloud endpoint behind the gateway.
#[derive(Debug, Default)]
pub struct CloudSink {
    received: u64,
    total_delay_us: u64,
}

impl CloudSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one arrival and its end-to-end delay.
    pub fn accept(&mut self, msg: &TelemetryMessage, now: SimTime) {
        let origin = SimTime::from_micros(msg.timestamp_us.max(0) as u64);
        let delay = now - origin;
        self.received += 1;
        self.total_delay_us += delay.as_micros();
        debug!(id = msg.id, delay_s = delay.as_secs_f64(), "message reached the sink");
    }

    /// Messages accepted so far.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Scalars for the end-of-run report.
    pub fn report(&self) -> CloudReport {
        let total_delay_s = self.total_delay_us as f64 / 1_000_000.0;
        CloudReport {
            received: self.received,
            total_delay_s,
            avg_delay_s: if self.received > 0 {
                total_delay_s / self.received as f64
            } else {
                0.0
            },
        }
    }
}
