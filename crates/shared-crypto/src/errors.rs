//! Error types for the crypto primitives.

use thiserror::Error;

/// Errors produced by codec and key-handling operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Input was not valid hex (odd length or non-hex character).
    #[error("invalid hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Decoded key material had the wrong length.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Required key length in bytes.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
}
