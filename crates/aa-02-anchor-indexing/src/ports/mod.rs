//! # Ports Layer
//!
//! - **Outbound (Driven)**: the document store the index writes to

pub mod outbound;
