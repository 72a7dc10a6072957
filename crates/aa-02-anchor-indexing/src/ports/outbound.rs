//! # Outbound Ports (Driven Ports)

use crate::domain::entities::{AnchorRecord, RecordQuery};
use crate::domain::errors::IndexError;
use chrono::{DateTime, Utc};

/// Document store holding anchor records.
///
/// Every call is off the admission path; failures are reported to the
/// indexer, never to the transaction handler.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert one record. Fails with `Duplicate` if the hash is present.
    async fn create(&self, record: AnchorRecord) -> Result<(), IndexError>;

    /// Insert several records; all or nothing.
    async fn create_many(&self, records: Vec<AnchorRecord>) -> Result<usize, IndexError>;

    /// All records matching `query`.
    async fn find(&self, query: &RecordQuery) -> Result<Vec<AnchorRecord>, IndexError>;

    async fn find_by_hash(&self, hash: &str) -> Result<Option<AnchorRecord>, IndexError>;

    async fn find_all_by_sender(&self, sender: &str) -> Result<Vec<AnchorRecord>, IndexError>;

    /// Stamp `confirmed_at`. Returns false if no record has this hash.
    async fn set_confirmed(&self, hash: &str, confirmed_at: DateTime<Utc>)
        -> Result<bool, IndexError>;

    /// Remove records matching `query`, returning how many were removed.
    async fn delete(&self, query: &RecordQuery) -> Result<usize, IndexError>;
}
