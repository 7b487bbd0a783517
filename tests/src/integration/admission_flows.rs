//! End-to-end admission behavior: benign traffic, attack traffic, and the
//! accounting-closure invariant that must hold for every run.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{forged_message, genuine_message};
    use eg_gateway::{Admission, DropReason, Gateway, GatewayConfig, RunReport};
    use shared_types::{SimDuration, SimTime};
    use sim_runtime::{AttackMode, SimConfig, Simulation};

    fn assert_closure(report: &RunReport) {
        assert_eq!(
            report.received,
            report.accepted + report.dropped_total(),
            "accounting closure must hold"
        );
        assert!(!report.accounting_mismatch);
    }

    #[test]
    fn test_mixed_trace_accounting_closes() {
        let mut gw = Gateway::new(&GatewayConfig::default());
        let mut t = 0.0f64;

        for seq in 1..=30u64 {
            t += 1.0;
            let now = SimTime::from_secs_f64(t);
            let ts = now.as_micros() as i64;
            let verdict = match seq % 5 {
                // Every fifth message carries a forged tag.
                0 => gw.admit(&forged_message(500_000 + seq as i64, 2, seq, ts), now),
                // Every seventh-ish replays an earlier sequence.
                3 => gw.admit(&genuine_message(500_100 + seq as i64, 2, 1, ts), now),
                _ => gw.admit(&genuine_message(500_000 + seq as i64, 2, seq, ts), now),
            };
            if seq == 1 {
                assert_eq!(verdict, Admission::Forwarded);
            }
        }

        let report = gw.finalize(SimDuration::from_secs_f64(t));
        assert!(report.dropped_mac > 0);
        assert!(report.dropped_replay > 0);
        assert!(report.accepted > 0);
        assert_closure(&report);
    }

    #[test]
    fn test_closure_holds_for_every_stage_order() {
        for order_id in 1..=6u8 {
            let config = GatewayConfig {
                stage_order_id: Some(order_id),
                ..Default::default()
            };
            let mut gw = Gateway::new(&config);
            let mut t = 0.0f64;

            for seq in 1..=20u64 {
                t += 1.0;
                let now = SimTime::from_secs_f64(t);
                let ts = now.as_micros() as i64;
                match seq % 3 {
                    0 => gw.admit(&forged_message(600_000 + seq as i64, 3, seq, ts), now),
                    1 => gw.admit(&genuine_message(600_000 + seq as i64, 3, seq, ts), now),
                    // Recycled id and stale sequence at once.
                    _ => gw.admit(&genuine_message(600_001, 3, 1, ts), now),
                };
            }

            let report = gw.finalize(SimDuration::from_secs_f64(t));
            assert_eq!(report.stage_order_id, order_id);
            assert_closure(&report);
        }
    }

    #[test]
    fn test_full_simulation_closure_under_replay_attack() {
        let config = SimConfig {
            duration: SimDuration::from_secs_f64(90.0),
            attack_mode: AttackMode::Replay,
            ..Default::default()
        };
        let outcome = Simulation::new(&config).run();

        assert_closure(&outcome.gateway);
        assert!(outcome.gateway.goodput_per_s > 0.0);
        assert_eq!(
            outcome.cloud.received, outcome.gateway.accepted,
            "zero processing delay: everything admitted reaches the sink"
        );
    }

    #[test]
    fn test_full_simulation_closure_under_mitm_attack() {
        let config = SimConfig {
            duration: SimDuration::from_secs_f64(90.0),
            attack_mode: AttackMode::Mitm,
            ..Default::default()
        };
        let outcome = Simulation::new(&config).run();

        assert_closure(&outcome.gateway);
        let attacker = outcome.attacker.expect("attacker enabled");
        assert_eq!(outcome.gateway.dropped_mac, attacker.attacks_sent);
    }

    #[test]
    fn test_ablation_disables_all_checks() {
        // Security on but every stage disabled: even forged traffic passes,
        // and the verify cost is still charged once per message.
        let config = GatewayConfig {
            check_mac: false,
            check_freshness: false,
            check_duplicate: false,
            ..Default::default()
        };
        let mut gw = Gateway::new(&config);
        let now = SimTime::from_secs_f64(1.0);
        assert_eq!(
            gw.admit(&forged_message(1, 0, 1, 1_000_000), now),
            Admission::Forwarded
        );

        let report = gw.finalize(SimDuration::from_secs_f64(1.0));
        assert_eq!(report.verify_attempts, 1);
        assert_eq!(report.stage_work.mac + report.stage_work.freshness + report.stage_work.duplicate, 0);
        assert_closure(&report);
    }

    #[test]
    fn test_drop_reasons_map_to_distinct_counters() {
        let mut gw = Gateway::new(&GatewayConfig::default());
        let now = SimTime::from_secs_f64(1.0);
        let ts = 1_000_000i64;

        assert_eq!(
            gw.admit(&genuine_message(700_001, 4, 1, ts), now),
            Admission::Forwarded
        );
        assert_eq!(
            gw.admit(&forged_message(700_002, 4, 2, ts), now),
            Admission::Dropped(DropReason::MacFailure)
        );
        assert_eq!(
            gw.admit(&genuine_message(700_003, 4, 1, ts), now),
            Admission::Dropped(DropReason::StaleReplay)
        );
        assert_eq!(
            gw.admit(&genuine_message(700_001, 4, 3, ts), now),
            Admission::Dropped(DropReason::Duplicate)
        );

        let report = gw.finalize(SimDuration::from_secs_f64(1.0));
        assert_eq!(
            (report.dropped_mac, report.dropped_replay, report.dropped_duplicate),
            (1, 1, 1)
        );
        assert_closure(&report);
    }
}
