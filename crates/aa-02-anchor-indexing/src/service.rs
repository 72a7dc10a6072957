//! # Anchor Indexer
//!
//! Bus subscriber that keeps the document store in step with the ledger:
//!
//! - `<family>/create` ledger event -> `create` an unconfirmed record
//! - `Committed` -> `set_confirmed`
//!
//! Nothing here can fail a transaction; errors are logged and counted.

use crate::domain::entities::AnchorRecord;
use crate::domain::errors::IndexError;
use crate::ports::outbound::DocumentStore;
use shared_bus::{AnchorEvent, EventFilter, EventTopic, Subscription};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// What handling one event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOutcome {
    /// A new record was stored.
    Created,
    /// An existing record was confirmed.
    Confirmed,
    /// A commit arrived for a hash that is not indexed.
    Unknown,
    /// Not an event this indexer cares about.
    Ignored,
}

impl IndexOutcome {
    /// Snake-case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Confirmed => "confirmed",
            Self::Unknown => "unknown",
            Self::Ignored => "ignored",
        }
    }
}

/// Running totals.
#[derive(Debug, Default)]
pub struct IndexerStats {
    pub created: AtomicU64,
    pub confirmed: AtomicU64,
    pub failed: AtomicU64,
}

/// Indexes anchors from bus events into a `DocumentStore`.
pub struct AnchorIndexer<S: DocumentStore> {
    store: Arc<S>,
    trusted_ca: String,
    event_type: String,
    stats: IndexerStats,
}

impl<S: DocumentStore> AnchorIndexer<S> {
    /// `trusted_ca` is recorded as each record's `ca`; `event_type` is the
    /// family's create event, e.g. `locationKey/create`.
    pub fn new(store: Arc<S>, trusted_ca: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self {
            store,
            trusted_ca: trusted_ca.into(),
            event_type: event_type.into(),
            stats: IndexerStats::default(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn stats(&self) -> &IndexerStats {
        &self.stats
    }

    /// Bus filter for the events this indexer consumes.
    pub fn filter(&self) -> EventFilter {
        EventFilter::topics(vec![EventTopic::Ledger, EventTopic::Commit])
            .with_event_types(vec![self.event_type.clone()])
    }

    /// Apply one event to the store.
    pub async fn handle(&self, event: &AnchorEvent) -> Result<IndexOutcome, IndexError> {
        let result = self.apply(event).await;
        match &result {
            Ok(IndexOutcome::Created) => {
                self.stats.created.fetch_add(1, Ordering::Relaxed);
            }
            Ok(IndexOutcome::Confirmed) => {
                self.stats.confirmed.fetch_add(1, Ordering::Relaxed);
            }
            Ok(_) => {}
            Err(_) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
            }
        }
        result
    }

    async fn apply(&self, event: &AnchorEvent) -> Result<IndexOutcome, IndexError> {
        match event {
            AnchorEvent::Ledger { event_type, .. } if *event_type == self.event_type => {
                let attribute = |key: &'static str| {
                    event
                        .attribute(key)
                        .ok_or(IndexError::MissingAttribute(key))
                };
                let record = AnchorRecord::new(
                    attribute("sender")?,
                    attribute("signer")?,
                    self.trusted_ca.as_str(),
                    attribute("hash")?,
                );
                debug!(hash = %record.hash, sender = %record.sender, "Indexing anchor");
                self.store.create(record).await?;
                Ok(IndexOutcome::Created)
            }
            AnchorEvent::Committed {
                hash, committed_at, ..
            } => {
                if self.store.set_confirmed(hash, *committed_at).await? {
                    Ok(IndexOutcome::Confirmed)
                } else {
                    Ok(IndexOutcome::Unknown)
                }
            }
            _ => Ok(IndexOutcome::Ignored),
        }
    }

    /// Consume `subscription` until the bus closes or `shutdown` flips to
    /// true. `observe` sees every successful outcome.
    pub async fn run<F>(
        &self,
        mut subscription: Subscription,
        mut shutdown: watch::Receiver<bool>,
        mut observe: F,
    ) where
        F: FnMut(IndexOutcome) + Send,
    {
        info!(event_type = %self.event_type, "Anchor indexer started");
        loop {
            tokio::select! {
                event = subscription.recv() => {
                    let Some(event) = event else {
                        debug!("Event bus closed");
                        break;
                    };
                    match self.handle(&event).await {
                        Ok(outcome) => {
                            if outcome == IndexOutcome::Unknown {
                                warn!(topic = ?event.topic(), "Commit for unindexed hash");
                            }
                            observe(outcome);
                        }
                        Err(e) => warn!(error = %e, "Failed to index event"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!(
            created = self.stats.created.load(Ordering::Relaxed),
            confirmed = self.stats.confirmed.load(Ordering::Relaxed),
            "Anchor indexer stopped"
        );
    }
}
