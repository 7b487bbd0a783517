//! Energy accounting: conservation under security, exhaustion as a
//! first-class drop reason, and the cost asymmetry between orderings.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{forged_message, genuine_message};
    use eg_gateway::{Admission, Gateway, GatewayConfig};
    use shared_types::{SimDuration, SimTime};
    use sim_runtime::{SimConfig, Simulation};

    #[test]
    fn test_energy_conservation_identity() {
        // battery_init - remaining == accepted * forward + verify_attempts * verify
        let config = GatewayConfig::default();
        let mut gw = Gateway::new(&config);
        let mut t = 0.0f64;

        for seq in 1..=40u64 {
            t += 1.0;
            let now = SimTime::from_secs_f64(t);
            let ts = now.as_micros() as i64;
            if seq % 4 == 0 {
                gw.admit(&forged_message(900_000 + seq as i64, 6, seq, ts), now);
            } else {
                gw.admit(&genuine_message(900_000 + seq as i64, 6, seq, ts), now);
            }
        }

        let report = gw.finalize(SimDuration::from_secs_f64(t));
        let expected_spend = report.accepted as f64 * config.cost_forward_mj
            + report.verify_attempts as f64 * config.cost_verify_mj;
        assert!(
            (report.energy_consumed_mj - expected_spend).abs() < 1e-6,
            "consumed {} != accepted*forward + verifies*verify = {}",
            report.energy_consumed_mj,
            expected_spend
        );
        assert!(
            (config.battery_init_mj - report.energy_remaining_mj - expected_spend).abs() < 1e-6
        );
    }

    #[test]
    fn test_energy_conservation_holds_in_full_simulation() {
        let config = SimConfig {
            duration: SimDuration::from_secs_f64(60.0),
            ..Default::default()
        };
        let gw_config = config.gateway.clone();
        let outcome = Simulation::new(&config).run();
        let report = &outcome.gateway;

        let expected_spend = report.accepted as f64 * gw_config.cost_forward_mj
            + report.verify_attempts as f64 * gw_config.cost_verify_mj;
        assert!((report.energy_consumed_mj - expected_spend).abs() < 1e-6);
    }

    #[test]
    fn test_exhaustion_drops_are_not_charged_and_closure_holds() {
        let config = GatewayConfig {
            battery_init_mj: 47.0, // four messages at 10 mJ, then 7 mJ stranded
            ..Default::default()
        };
        let mut gw = Gateway::new(&config);

        for seq in 1..=10u64 {
            let now = SimTime::from_secs_f64(seq as f64);
            let msg = genuine_message(910_000 + seq as i64, 7, seq, now.as_micros() as i64);
            gw.admit(&msg, now);
        }

        let report = gw.finalize(SimDuration::from_secs_f64(10.0));
        assert_eq!(report.accepted, 4);
        assert_eq!(report.dropped_energy, 6);
        assert!(
            (report.energy_remaining_mj - 7.0).abs() < 1e-9,
            "starved messages must leave the balance untouched"
        );
        assert_eq!(report.received, report.accepted + report.dropped_total());
    }

    #[test]
    fn test_security_off_skips_verify_cost_entirely() {
        let config = GatewayConfig {
            security_enabled: false,
            ..Default::default()
        };
        let mut gw = Gateway::new(&config);

        for seq in 1..=5u64 {
            let now = SimTime::from_secs_f64(seq as f64);
            let msg = genuine_message(920_000 + seq as i64, 8, seq, now.as_micros() as i64);
            assert_eq!(gw.admit(&msg, now), Admission::Forwarded);
        }

        let report = gw.finalize(SimDuration::from_secs_f64(5.0));
        assert_eq!(report.verify_attempts, 0);
        assert!((report.energy_consumed_mj - 25.0).abs() < 1e-9, "forward cost only");
    }

    #[test]
    fn test_energy_per_accepted_message() {
        let mut gw = Gateway::new(&GatewayConfig::default());
        for seq in 1..=3u64 {
            let now = SimTime::from_secs_f64(seq as f64);
            let msg = genuine_message(930_000 + seq as i64, 9, seq, now.as_micros() as i64);
            gw.admit(&msg, now);
        }

        let report = gw.finalize(SimDuration::from_secs_f64(3.0));
        // 10 mJ per admitted message (5 verify + 5 forward), nothing dropped.
        assert!((report.energy_per_accepted_mj - 10.0).abs() < 1e-9);
    }
}
