//! Cross-crate integration scenarios.

pub mod admission_flows;
pub mod energy;
pub mod membership_bounds;
pub mod stage_ordering;

#[cfg(test)]
pub(crate) mod fixtures {
    use eg_gateway::GatewayConfig;
    use shared_crypto::{compute_tag, hex_encode, pack_id_timestamp, MacKey};
    use shared_types::TelemetryMessage;

    /// The key every fixture shares with the gateway's default config.
    pub fn test_key() -> MacKey {
        MacKey::from_hex(&GatewayConfig::default().aes_key_hex).expect("default key is valid")
    }

    /// A message with a genuine tag over its packed id and timestamp.
    pub fn genuine_message(id: i64, source: i32, sequence: u64, ts_us: i64) -> TelemetryMessage {
        let tag = compute_tag(&test_key(), &pack_id_timestamp(id as i32, ts_us));
        TelemetryMessage {
            id,
            source,
            sequence,
            mac_hex: hex_encode(&tag),
            timestamp_us: ts_us,
        }
    }

    /// A message whose tag is well-formed hex but cryptographically wrong.
    pub fn forged_message(id: i64, source: i32, sequence: u64, ts_us: i64) -> TelemetryMessage {
        TelemetryMessage {
            id,
            source,
            sequence,
            mac_hex: "deadbeefdeadbeefdeadbeefdeadbeef".to_string(),
            timestamp_us: ts_us,
        }
    }
}
