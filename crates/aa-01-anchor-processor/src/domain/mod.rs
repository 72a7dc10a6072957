//! # Domain Layer
//!
//! Codec, certificate and payload models, verification, address derivation
//! and the state record. No I/O.

pub mod address;
pub mod certificate;
pub mod codec;
pub mod config;
pub mod errors;
pub mod payload;
pub mod state;
pub mod verification;
