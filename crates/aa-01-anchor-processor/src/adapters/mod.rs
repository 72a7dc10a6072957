//! # Adapters Module
//!
//! Infrastructure adapters implementing the ports.

pub mod memory_state;
