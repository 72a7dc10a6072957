//! # Ports Layer
//!
//! - **Inbound (Driving)**: the transaction handler contract the host calls
//! - **Outbound (Driven)**: the host state and event context the handler uses

pub mod inbound;
pub mod outbound;
