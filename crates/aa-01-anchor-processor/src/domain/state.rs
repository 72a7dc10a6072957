//! # Ledger State Record
//!
//! The value stored at an address: content hash -> data, encoded as a CBOR
//! map with keys in sorted order. Merges are additive. A hash already present with
//! the same data is a no-op; with different data it is a conflict.

use super::errors::AdmissionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of merging one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// New entry; the state must be written.
    Inserted,
    /// Identical entry already present; nothing to write.
    Unchanged,
}

/// Decoded state bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorState(BTreeMap<String, String>);

impl AnchorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode prior state. Absent or empty bytes are an empty bucket.
    pub fn decode(bytes: Option<&[u8]>) -> Result<Self, AdmissionError> {
        match bytes {
            None => Ok(Self::new()),
            Some([]) => Ok(Self::new()),
            Some(bytes) => ciborium::de::from_reader(bytes).map_err(|e| {
                AdmissionError::InternalStateError(format!("failed to load state data: {e}"))
            }),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, AdmissionError> {
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(self, &mut bytes).map_err(|e| {
            AdmissionError::InternalStateError(format!("failed to encode state data: {e}"))
        })?;
        Ok(bytes)
    }

    /// Add `hash -> data`.
    pub fn merge(&mut self, hash: &str, data: &str) -> Result<MergeOutcome, AdmissionError> {
        match self.0.get(hash) {
            Some(existing) if existing == data => Ok(MergeOutcome::Unchanged),
            Some(_) => Err(AdmissionError::InternalStateError(format!(
                "conflicting entry for hash {hash}"
            ))),
            None => {
                self.0.insert(hash.to_string(), data.to_string());
                Ok(MergeOutcome::Inserted)
            }
        }
    }

    pub fn get(&self, hash: &str) -> Option<&str> {
        self.0.get(hash).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, String>> for AnchorState {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self(entries)
    }
}
