//! Attack simulations against the admission path.

pub mod forged_authority;
pub mod payload_tampering;
