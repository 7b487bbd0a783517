//! # Shared Crypto - Message Authentication Primitives
//!
//! ## Components
//!
//! | Module | Contents | Use Case |
//! |--------|----------|----------|
//! | `codec` | hex conversion, big-endian packing | MAC-input buffers, tag rendering |
//! | `cmac` | AES-128-CMAC (SP 800-38B) | Per-message authentication tags |
//!
//! ## Security Properties
//!
//! - **AES-128-CMAC**: one-key MAC over arbitrary-length byte strings, two
//!   subkeys derived by GF(2^128) doubling of `AES-128(key, 0^128)`
//! - **Constant-time verification**: tag comparison accumulates the XOR of
//!   all byte pairs and compares once at the end, so verification time does
//!   not depend on where a forged tag first diverges
//! - **Key hygiene**: [`MacKey`] zeroizes its bytes on drop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cmac;
pub mod codec;
pub mod errors;

// Re-exports
pub use cmac::{compute_tag, constant_time_eq, verify_tag, MacKey, KEY_LEN, TAG_LEN};
pub use codec::{hex_decode, hex_encode, pack_id_timestamp};
pub use errors::CryptoError;
