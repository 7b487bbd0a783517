//! First-failing-stage attribution under the six configured orderings.
//!
//! The same trace produces different drop attributions (and different
//! per-stage work) depending on the order, which is exactly what the
//! ordering comparison measures.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::genuine_message;
    use eg_gateway::{Gateway, GatewayConfig, RunReport};
    use shared_types::{SimDuration, SimTime};

    /// Admit one good message, then one message that is simultaneously
    /// bad-MAC and stale (same source and sequence, corrupted tag).
    fn run_conflicted_trace(config: GatewayConfig) -> RunReport {
        let mut gw = Gateway::new(&config);
        let now = SimTime::from_secs_f64(1.0);

        let good = genuine_message(800_001, 5, 9, 1_000_000);
        assert_eq!(
            gw.admit(&good, now),
            eg_gateway::Admission::Forwarded,
            "setup message must be admitted"
        );

        let mut conflicted = genuine_message(800_002, 5, 9, 1_100_000);
        conflicted.mac_hex = "ffffffffffffffffffffffffffffffff".to_string();
        gw.admit(&conflicted, SimTime::from_secs_f64(1.1));

        gw.finalize(SimDuration::from_secs_f64(2.0))
    }

    #[test]
    fn test_hfb_attributes_conflicted_drop_to_mac() {
        let report = run_conflicted_trace(GatewayConfig {
            stage_order: Some("HFB".to_string()),
            ..Default::default()
        });
        assert_eq!(report.dropped_mac, 1);
        assert_eq!(report.dropped_replay, 0);
    }

    #[test]
    fn test_fhb_attributes_conflicted_drop_to_staleness() {
        let report = run_conflicted_trace(GatewayConfig {
            stage_order: Some("FHB".to_string()),
            ..Default::default()
        });
        assert_eq!(report.dropped_mac, 0);
        assert_eq!(report.dropped_replay, 1);
    }

    #[test]
    fn test_numeric_id_form_matches_string_form() {
        // Id 3 is FHB; both forms must attribute identically.
        let by_string = run_conflicted_trace(GatewayConfig {
            stage_order: Some("FHB".to_string()),
            ..Default::default()
        });
        let by_id = run_conflicted_trace(GatewayConfig {
            stage_order_id: Some(3),
            ..Default::default()
        });
        assert_eq!(by_string.dropped_replay, by_id.dropped_replay);
        assert_eq!(by_string.stage_order_id, by_id.stage_order_id);
    }

    #[test]
    fn test_later_stages_do_no_work_after_a_failure() {
        // Under HFB the conflicted message dies at MAC, so freshness and
        // duplicate each ran only for the good message.
        let report = run_conflicted_trace(GatewayConfig {
            stage_order: Some("HFB".to_string()),
            ..Default::default()
        });
        assert_eq!(report.stage_work.mac, 2);
        assert_eq!(report.stage_work.freshness, 1);
        assert_eq!(report.stage_work.duplicate, 1);

        // Under FHB the failure moves one slot later: freshness ran twice,
        // MAC only once (for the good message).
        let report = run_conflicted_trace(GatewayConfig {
            stage_order: Some("FHB".to_string()),
            ..Default::default()
        });
        assert_eq!(report.stage_work.freshness, 2);
        assert_eq!(report.stage_work.mac, 1);
        assert_eq!(report.stage_work.duplicate, 1);
    }

    #[test]
    fn test_work_averages_are_per_received_message() {
        let report = run_conflicted_trace(GatewayConfig {
            stage_order: Some("HFB".to_string()),
            ..Default::default()
        });
        assert_eq!(report.received, 2);
        assert!((report.stage_work.mac_per_received - 1.0).abs() < 1e-12);
        assert!((report.stage_work.freshness_per_received - 0.5).abs() < 1e-12);
    }
}
