//! # SHA-512 Hashing and Nonce Tokens
//!
//! Content hashes and namespace prefixes are lowercase hex SHA-512 digests
//! (128 hex characters). Nonces are random hex tokens.

use rand::RngCore;
use sha2::{Digest, Sha512};

/// SHA-512 output (512-bit).
pub type Sha512Digest = [u8; 64];

/// Length of a hex encoded SHA-512 digest.
pub const SHA512_HEX_LENGTH: usize = 128;

/// Default number of random bytes in a nonce token.
pub const NONCE_TOKEN_BYTES: usize = 32;

/// Hash data with SHA-512 (one-shot).
pub fn sha512(data: &[u8]) -> Sha512Digest {
    Sha512::digest(data).into()
}

/// Hash data with SHA-512 and return lowercase hex.
pub fn sha512_hex(data: &[u8]) -> String {
    hex::encode(sha512(data))
}

/// Random hex token of `NONCE_TOKEN_BYTES` bytes (64 hex chars).
pub fn random_token_hex() -> String {
    random_token_hex_with_len(NONCE_TOKEN_BYTES)
}

/// Random hex token of `len` bytes.
pub fn random_token_hex_with_len(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// True when `value` is non-empty lowercase-or-uppercase hex.
pub fn is_hex(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_hexdigit())
}
