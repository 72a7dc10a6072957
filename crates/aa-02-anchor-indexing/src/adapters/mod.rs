//! # Adapters Module

pub mod memory_store;
