//! # Byte/Hex Codec
//!
//! Deterministic hex⇄byte conversion and the big-endian packing used to build
//! MAC-input buffers. Pure functions, no side effects.

use crate::errors::CryptoError;

/// Encode bytes as lowercase hex, two characters per byte.
pub fn hex_encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex string into bytes.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidHex`] when the input has odd length or
/// contains a non-hex character.
pub fn hex_decode(text: &str) -> Result<Vec<u8>, CryptoError> {
    Ok(hex::decode(text)?)
}

/// Pack a message id and origin timestamp into the 12-byte MAC input.
///
/// Layout: `id` (i32) big-endian in bytes [0, 4), `timestamp_us` (i64)
/// big-endian in bytes [4, 12).
pub fn pack_id_timestamp(id: i32, timestamp_us: i64) -> [u8; 12] {
    let mut out = [0u8; 12];
    out[..4].copy_from_slice(&id.to_be_bytes());
    out[4..].copy_from_slice(&timestamp_us.to_be_bytes());
    out
}
