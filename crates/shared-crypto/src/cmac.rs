//! # AES-128-CMAC
//!
//! One-key MAC over arbitrary-length byte strings per NIST SP 800-38B,
//! built on the `aes` block cipher.
//!
//! Subkeys K1/K2 are derived from `L = AES-128(key, 0^128)` by doubling in
//! GF(2^128) with the 0x87 reduction applied when the shifted-out bit is set.
//! The final block is XORed with K1 when the message is a non-empty multiple
//! of 16 bytes, otherwise 0x80-padded and XORed with K2; all blocks CBC-chain
//! through the cipher with a zero IV and the last ciphertext block is the tag.
//! A zero-length message is one padded block.

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;
use zeroize::Zeroize;

use crate::codec::hex_decode;
use crate::errors::CryptoError;

/// MAC key length in bytes.
pub const KEY_LEN: usize = 16;

/// MAC tag length in bytes.
pub const TAG_LEN: usize = 16;

/// GF(2^128) reduction constant for subkey doubling.
const RB: u8 = 0x87;

/// A 128-bit CMAC key, zeroized on drop.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct MacKey([u8; KEY_LEN]);

impl MacKey {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse from a 32-character hex string.
    ///
    /// # Errors
    ///
    /// [`CryptoError::InvalidHex`] on malformed hex,
    /// [`CryptoError::InvalidKeyLength`] when the decoded length is not 16.
    pub fn from_hex(text: &str) -> Result<Self, CryptoError> {
        let bytes = hex_decode(text)?;
        let array: [u8; KEY_LEN] =
            bytes
                .try_into()
                .map_err(|v: Vec<u8>| CryptoError::InvalidKeyLength {
                    expected: KEY_LEN,
                    actual: v.len(),
                })?;
        Ok(Self(array))
    }

    /// The all-zero key used as a recovery default for bad configuration.
    pub fn zero() -> Self {
        Self([0u8; KEY_LEN])
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for MacKey {
    /// Key material never appears in logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MacKey(..)")
    }
}

/// Double a 128-bit value in GF(2^128).
///
/// Left-shifts the whole block by one bit and applies the 0x87 reduction to
/// the last byte when the shifted-out (top) bit was set.
fn dbl(block: &[u8; 16]) -> [u8; 16] {
    let mut out = [0u8; 16];
    let mut carry = 0u8;
    for i in (0..16).rev() {
        out[i] = (block[i] << 1) | carry;
        carry = block[i] >> 7;
    }
    if carry == 1 {
        out[15] ^= RB;
    }
    out
}

fn xor_in_place(acc: &mut [u8; 16], other: &[u8]) {
    for (a, b) in acc.iter_mut().zip(other) {
        *a ^= b;
    }
}

/// Compute the AES-128-CMAC tag of `message` under `key`.
pub fn compute_tag(key: &MacKey, message: &[u8]) -> [u8; TAG_LEN] {
    let cipher = Aes128::new(GenericArray::from_slice(key.as_bytes()));

    // L = AES-128(key, 0^128), then K1 = dbl(L), K2 = dbl(K1).
    let mut l = GenericArray::from([0u8; 16]);
    cipher.encrypt_block(&mut l);
    let k1 = dbl(&l.into());
    let k2 = dbl(&k1);

    let block_count = message.len().div_ceil(16).max(1);
    let last_complete = !message.is_empty() && message.len() % 16 == 0;

    let mut last = [0u8; 16];
    if last_complete {
        last.copy_from_slice(&message[16 * (block_count - 1)..]);
        xor_in_place(&mut last, &k1);
    } else {
        let rem = message.len() % 16;
        last[..rem].copy_from_slice(&message[16 * (block_count - 1)..]);
        last[rem] = 0x80;
        xor_in_place(&mut last, &k2);
    }

    // CBC chain with zero IV; the final ciphertext block is the tag.
    let mut x = [0u8; 16];
    for block in message.chunks_exact(16).take(block_count - 1) {
        xor_in_place(&mut x, block);
        let mut y = GenericArray::from(x);
        cipher.encrypt_block(&mut y);
        x = y.into();
    }

    xor_in_place(&mut x, &last);
    let mut tag = GenericArray::from(x);
    cipher.encrypt_block(&mut tag);
    tag.into()
}

/// Verify a candidate tag against the CMAC of `message` under `key`.
///
/// Comparison is constant-time over the full tag; a wrong-length candidate
/// fails without computing anything.
pub fn verify_tag(key: &MacKey, message: &[u8], candidate: &[u8]) -> bool {
    if candidate.len() != TAG_LEN {
        return false;
    }
    let expected = compute_tag(key, message);
    constant_time_eq(&expected, candidate)
}

/// Constant-time byte-slice equality.
///
/// Accumulates the XOR of every byte pair and compares to zero once at the
/// end, so the running time does not depend on the position of the first
/// mismatch. Length mismatch returns early; lengths are public here.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut acc = 0u8;
    for (x, y) in a.iter().zip(b) {
        acc |= x ^ y;
    }
    acc == 0
}
