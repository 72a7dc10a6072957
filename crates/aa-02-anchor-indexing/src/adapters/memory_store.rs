//! In-memory document store.

use crate::domain::entities::{AnchorRecord, IndexConfig, RecordQuery};
use crate::domain::errors::IndexError;
use crate::ports::outbound::DocumentStore;
use chrono::{DateTime, Utc};
use std::sync::RwLock;

/// `DocumentStore` backed by a vector, kept in insertion order.
pub struct InMemoryDocumentStore {
    config: IndexConfig,
    records: RwLock<Vec<AnchorRecord>>,
}

impl InMemoryDocumentStore {
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new(IndexConfig::default())
    }
}

fn poisoned<T>(_: T) -> IndexError {
    IndexError::Store("record lock poisoned".into())
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(&self, record: AnchorRecord) -> Result<(), IndexError> {
        let mut records = self.records.write().map_err(poisoned)?;
        if records.iter().any(|r| r.hash == record.hash) {
            return Err(IndexError::Duplicate(record.hash));
        }
        records.push(record);
        Ok(())
    }

    async fn create_many(&self, new_records: Vec<AnchorRecord>) -> Result<usize, IndexError> {
        let mut records = self.records.write().map_err(poisoned)?;
        for (i, record) in new_records.iter().enumerate() {
            let seen_before = new_records[..i].iter().any(|r| r.hash == record.hash);
            if seen_before || records.iter().any(|r| r.hash == record.hash) {
                return Err(IndexError::Duplicate(record.hash.clone()));
            }
        }
        let count = new_records.len();
        records.extend(new_records);
        Ok(count)
    }

    async fn find(&self, query: &RecordQuery) -> Result<Vec<AnchorRecord>, IndexError> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.iter().filter(|r| query.matches(r)).cloned().collect())
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<AnchorRecord>, IndexError> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.iter().find(|r| r.hash == hash).cloned())
    }

    async fn find_all_by_sender(&self, sender: &str) -> Result<Vec<AnchorRecord>, IndexError> {
        self.find(&RecordQuery::by_sender(sender)).await
    }

    async fn set_confirmed(
        &self,
        hash: &str,
        confirmed_at: DateTime<Utc>,
    ) -> Result<bool, IndexError> {
        let mut records = self.records.write().map_err(poisoned)?;
        match records.iter_mut().find(|r| r.hash == hash) {
            Some(record) => {
                record.confirmed_at = Some(confirmed_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, query: &RecordQuery) -> Result<usize, IndexError> {
        let mut records = self.records.write().map_err(poisoned)?;
        let before = records.len();
        records.retain(|r| !query.matches(r));
        Ok(before - records.len())
    }
}
