//! Indexing errors.

use thiserror::Error;

/// Errors from the anchor index.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndexError {
    /// A record with this hash is already indexed.
    #[error("Duplicate record for hash {0}")]
    Duplicate(String),

    /// A ledger event lacked a required attribute.
    #[error("Event missing attribute: {0}")]
    MissingAttribute(&'static str),

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(String),
}
