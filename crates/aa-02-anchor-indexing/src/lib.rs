//! # Anchor Indexing Subsystem (AA-02)
//!
//! Off-ledger index of anchors for query by hash or sender, fed from the
//! event bus. Indexing never sits on the admission path: the processor
//! publishes, the indexer consumes, and a store failure is only logged.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `AnchorRecord`, `RecordQuery`, errors
//! - **Ports Layer** (`ports/`): `DocumentStore`
//! - **Adapters** (`adapters/`): in-memory store
//! - **Service Layer** (`service.rs`): `AnchorIndexer`

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::memory_store::InMemoryDocumentStore;
pub use domain::entities::{
    AnchorRecord, IndexConfig, RecordQuery, DEFAULT_COLLECTION, DEFAULT_DATABASE,
};
pub use domain::errors::IndexError;
pub use ports::outbound::DocumentStore;
pub use service::{AnchorIndexer, IndexOutcome, IndexerStats};
