//! # Index Entities
//!
//! One `AnchorRecord` per admitted payload hash, confirmed once the host has
//! committed the write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default database name.
pub const DEFAULT_DATABASE: &str = "air_anchor";

/// Default collection name.
pub const DEFAULT_COLLECTION: &str = "anchors";

/// Indexed anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorRecord {
    /// Device key from the certificate request.
    pub sender: String,
    /// Batcher key that submitted the transaction.
    pub signer: String,
    /// CA key the anchor was authorized under.
    pub ca: String,
    /// Content hash of the payload.
    pub hash: String,
    /// Set once the state write is committed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl AnchorRecord {
    /// Unconfirmed record.
    pub fn new(
        sender: impl Into<String>,
        signer: impl Into<String>,
        ca: impl Into<String>,
        hash: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            signer: signer.into(),
            ca: ca.into(),
            hash: hash.into(),
            confirmed_at: None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }
}

/// Conjunctive filter over records. `None` fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub sender: Option<String>,
    pub signer: Option<String>,
    pub ca: Option<String>,
    pub hash: Option<String>,
    pub confirmed: Option<bool>,
}

impl RecordQuery {
    /// Matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_hash(hash: impl Into<String>) -> Self {
        Self {
            hash: Some(hash.into()),
            ..Self::default()
        }
    }

    pub fn by_sender(sender: impl Into<String>) -> Self {
        Self {
            sender: Some(sender.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn confirmed(mut self, confirmed: bool) -> Self {
        self.confirmed = Some(confirmed);
        self
    }

    pub fn matches(&self, record: &AnchorRecord) -> bool {
        fn field(expected: &Option<String>, actual: &str) -> bool {
            expected.as_deref().map_or(true, |value| value == actual)
        }

        field(&self.sender, &record.sender)
            && field(&self.signer, &record.signer)
            && field(&self.ca, &record.ca)
            && field(&self.hash, &record.hash)
            && self
                .confirmed
                .map_or(true, |confirmed| confirmed == record.is_confirmed())
    }
}

/// Where records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    pub database: String,
    pub collection: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}
