//! # Shared Crypto - secp256k1 and SHA-512 Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `context` | secp256k1 ECDSA | Certificate request and CA countersignatures |
//! | `ecdsa` | secp256k1 | Hex key and signature encodings |
//! | `hashing` | SHA-512 | Content hashes, namespace prefixes, nonce tokens |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic, low-S normalization
//! - **Context**: constructed once, never mutated, passed explicitly

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod ecdsa;
pub mod errors;
pub mod hashing;

// Re-exports
pub use context::{Secp256k1Context, Signer};
pub use ecdsa::{Secp256k1PrivateKey, Secp256k1PublicKey, Secp256k1Signature};
pub use errors::CryptoError;
pub use hashing::{is_hex, random_token_hex, sha512, sha512_hex};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
