//! # Domain Layer
//!
//! Record schema, queries and errors of the anchor index.

pub mod entities;
pub mod errors;
