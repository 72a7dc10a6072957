//! Cross-crate integration tests.

pub mod e2e_choreography;
