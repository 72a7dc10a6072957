//! # In-Memory Host State
//!
//! Stand-in for the ledger host: a `BTreeMap` of addresses to bytes, one
//! transaction applied at a time. Each transaction runs against an
//! `InMemoryContext` that buffers writes and events; they are committed
//! together only if `apply` returns `Ok`, and ledger events are then
//! forwarded to the event bus.

use crate::domain::address::StateAddress;
use crate::domain::errors::AdmissionError;
use crate::ports::inbound::{RawTransaction, TransactionHandler};
use crate::ports::outbound::{ContextError, StateContext};
use shared_bus::{AnchorEvent, EventPublisher};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// What a committed transaction changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReceipt {
    /// Addresses written, in address order.
    pub written: Vec<StateAddress>,
    /// Ledger events attached by the handler.
    pub events: Vec<AnchorEvent>,
}

/// In-memory ledger state.
pub struct InMemoryState {
    entries: RwLock<BTreeMap<StateAddress, Vec<u8>>>,
    publisher: Option<Arc<dyn EventPublisher>>,
    reject_writes: bool,
    reject_events: bool,
}

impl InMemoryState {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            publisher: None,
            reject_writes: false,
            reject_events: false,
        }
    }

    /// Forward committed ledger events to `publisher`.
    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Refuse every write, as a host does on an ownership conflict.
    #[must_use]
    pub fn rejecting_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    /// Refuse every `add_event` call.
    #[must_use]
    pub fn rejecting_events(mut self) -> Self {
        self.reject_events = true;
        self
    }

    /// Committed value at `address`.
    pub fn get(&self, address: &StateAddress) -> Result<Option<Vec<u8>>, ContextError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| ContextError::ReadFailed("state lock poisoned".into()))?;
        Ok(entries.get(address).cloned())
    }

    /// Seed committed state directly.
    pub fn insert(&self, address: StateAddress, value: Vec<u8>) -> Result<(), ContextError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ContextError::WriteFailed("state lock poisoned".into()))?;
        entries.insert(address, value);
        Ok(())
    }

    /// Copy of all committed state.
    pub fn snapshot(&self) -> Result<BTreeMap<StateAddress, Vec<u8>>, ContextError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| ContextError::ReadFailed("state lock poisoned".into()))?;
        Ok(entries.clone())
    }

    /// Apply `transaction` with `handler` and commit on success.
    ///
    /// Transactions are serialized by the state lock. On error nothing is
    /// committed and no event is published.
    pub fn execute(
        &self,
        handler: &dyn TransactionHandler,
        transaction: &RawTransaction,
    ) -> Result<ExecutionReceipt, AdmissionError> {
        let receipt = {
            let mut entries = self.entries.write().map_err(|_| {
                AdmissionError::InternalStateError("state lock poisoned".into())
            })?;

            let mut context = InMemoryContext {
                committed: &*entries,
                namespaces: handler.namespaces(),
                pending: BTreeMap::new(),
                events: Vec::new(),
                reject_writes: self.reject_writes,
                reject_events: self.reject_events,
            };
            handler.apply(transaction, &mut context)?;

            let InMemoryContext {
                pending, events, ..
            } = context;
            let written: Vec<StateAddress> = pending.keys().cloned().collect();
            entries.extend(pending);

            debug!(written = written.len(), events = events.len(), "Transaction committed");
            ExecutionReceipt { written, events }
        };

        if let Some(publisher) = &self.publisher {
            for event in &receipt.events {
                publisher.publish_now(event.clone());
            }
        }

        Ok(receipt)
    }
}

impl Default for InMemoryState {
    fn default() -> Self {
        Self::new()
    }
}

/// One transaction's view of `InMemoryState`.
pub struct InMemoryContext<'a> {
    committed: &'a BTreeMap<StateAddress, Vec<u8>>,
    namespaces: Vec<String>,
    pending: BTreeMap<StateAddress, Vec<u8>>,
    events: Vec<AnchorEvent>,
    reject_writes: bool,
    reject_events: bool,
}

impl InMemoryContext<'_> {
    fn owns(&self, address: &StateAddress) -> bool {
        self.namespaces.iter().any(|prefix| address.in_namespace(prefix))
    }
}

impl StateContext for InMemoryContext<'_> {
    fn get_state(
        &self,
        addresses: &[StateAddress],
    ) -> Result<BTreeMap<StateAddress, Vec<u8>>, ContextError> {
        Ok(addresses
            .iter()
            .filter_map(|address| {
                self.pending
                    .get(address)
                    .or_else(|| self.committed.get(address))
                    .map(|value| (address.clone(), value.clone()))
            })
            .collect())
    }

    fn set_state(
        &mut self,
        entries: BTreeMap<StateAddress, Vec<u8>>,
    ) -> Result<Vec<StateAddress>, ContextError> {
        if self.reject_writes || !entries.keys().all(|address| self.owns(address)) {
            return Ok(Vec::new());
        }
        let written = entries.keys().cloned().collect();
        self.pending.extend(entries);
        Ok(written)
    }

    fn add_event(
        &mut self,
        event_type: &str,
        attributes: Vec<(String, String)>,
        data: Vec<u8>,
    ) -> Result<(), ContextError> {
        if self.reject_events {
            return Err(ContextError::EventRejected(event_type.to_string()));
        }
        self.events.push(AnchorEvent::Ledger {
            event_type: event_type.to_string(),
            attributes,
            data,
        });
        Ok(())
    }
}
