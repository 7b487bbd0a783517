//! Probabilistic duplicate detection exercised through the whole pipeline:
//! Bloom saturation and false-positive accounting, SBF steady-state bounds.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::genuine_message;
    use eg_gateway::{Admission, DropReason, Gateway, GatewayConfig};
    use eg_membership::{DuplicateMethod, MembershipConfig};
    use shared_types::{SimDuration, SimTime};

    fn gateway_with(method: DuplicateMethod, membership: MembershipConfig) -> Gateway {
        Gateway::new(&GatewayConfig {
            membership: MembershipConfig { method, ..membership },
            ..Default::default()
        })
    }

    #[test]
    fn test_bloom_catches_every_true_duplicate() {
        // No false negatives: a recycled id is caught no matter how full the
        // filter is.
        let mut gw = gateway_with(DuplicateMethod::Bloom, MembershipConfig::default());
        let mut t = 0.0f64;

        for round in 1..=50u64 {
            t += 1.0;
            let now = SimTime::from_secs_f64(t);
            let ts = now.as_micros() as i64;
            let id = 100_000 + round as i64;
            assert_eq!(
                gw.admit(&genuine_message(id, 1, round * 2, ts), now),
                Admission::Forwarded
            );

            t += 0.1;
            let resend = genuine_message(id, 1, round * 2 + 1, (t * 1e6) as i64);
            assert_eq!(
                gw.admit(&resend, SimTime::from_secs_f64(t)),
                Admission::Dropped(DropReason::Duplicate),
                "round {round}: recycled id must be caught"
            );
        }
    }

    #[test]
    fn test_saturated_bloom_reports_false_positives() {
        // An absurdly small filter (floor size) saturates almost instantly;
        // from then on every fresh id is a measured false positive.
        let mut gw = gateway_with(
            DuplicateMethod::Bloom,
            MembershipConfig {
                bloom_bits: 8,
                bloom_hashes: 2,
                ..Default::default()
            },
        );
        let mut t = 0.0f64;
        for seq in 1..=100u64 {
            t += 1.0;
            let now = SimTime::from_secs_f64(t);
            gw.admit(
                &genuine_message(200_000 + seq as i64, 1, seq, now.as_micros() as i64),
                now,
            );
        }

        let report = gw.finalize(SimDuration::from_secs_f64(t));
        assert!(
            report.membership_false_positives > 0,
            "a saturated filter must misfire on fresh ids"
        );
        assert!(report.false_positive_rate > 0.1);
        assert_eq!(
            report.received,
            report.accepted + report.dropped_total(),
            "false positives drop messages but never break closure"
        );
    }

    #[test]
    fn test_exact_set_never_misfires() {
        let mut gw = gateway_with(DuplicateMethod::Set, MembershipConfig::default());
        let mut t = 0.0f64;
        for seq in 1..=200u64 {
            t += 0.5;
            let now = SimTime::from_secs_f64(t);
            let verdict = gw.admit(
                &genuine_message(300_000 + seq as i64, 1, seq, now.as_micros() as i64),
                now,
            );
            assert_eq!(verdict, Admission::Forwarded, "distinct ids always pass the exact set");
        }
        assert_eq!(gw.finalize(SimDuration::from_secs_f64(t)).membership_false_positives, 0);
    }

    #[test]
    fn test_sbf_steady_state_false_positive_rate_is_bounded() {
        // Aggressive aging (decay 3 on k=3: nine decrements per insert)
        // holds counter occupancy near 1/3, so three-probe queries on fresh
        // ids misfire only a few percent of the time.
        let mut gw = Gateway::new(&GatewayConfig {
            battery_init_mj: 100_000.0, // ample: the structure is under test, not the budget
            membership: MembershipConfig {
                method: DuplicateMethod::Sbf,
                sbf_bits: 1024,
                sbf_hashes: 3,
                sbf_decay: 3.0,
                ..Default::default()
            },
            ..Default::default()
        });
        let mut t = 0.0f64;
        for seq in 1..=5000u64 {
            t += 0.01;
            let now = SimTime::from_secs_f64(t);
            gw.admit(
                &genuine_message(400_000 + seq as i64, 1, seq, now.as_micros() as i64),
                now,
            );
        }

        let report = gw.finalize(SimDuration::from_secs_f64(t));
        assert_eq!(report.duplicate_method, "sbf");
        assert_eq!(report.membership_queries, 5000, "every message reaches the duplicate stage");
        assert!(
            report.false_positive_rate < 0.2,
            "steady-state rate must stay bounded, got {}",
            report.false_positive_rate
        );
    }
}
