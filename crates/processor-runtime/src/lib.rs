//! # Processor Runtime
//!
//! Wires the anchor subsystems into one process:
//!
//! ```text
//! RawTransaction ──► InMemoryState::execute ──► AnchorTransactionHandler
//!                          │ commit
//!                          ▼
//!                   InMemoryEventBus ──► AnchorIndexer ──► InMemoryDocumentStore
//! ```
//!
//! Ledger events reach the bus only after the host commits. The runtime then
//! publishes a `Committed` event per written address, or a `Rejected` event
//! for the audit trail.

pub mod config;

use aa_01_anchor_processor::{
    AdmissionError, AnchorTransactionHandler, CertificateVerifier, InMemoryState, RawTransaction,
};
use aa_02_anchor_indexing::{AnchorIndexer, InMemoryDocumentStore};
use anchor_telemetry::{
    metric_inc, time_histogram, APPLY_DURATION, EVENTS_EMITTED, RECORDS_INDEXED,
    TRANSACTIONS_ADMITTED, TRANSACTIONS_RECEIVED, TRANSACTIONS_REJECTED,
};
use anyhow::Result;
use chrono::Utc;
use parking_lot::Mutex;
use shared_bus::{AnchorEvent, EventPublisher, InMemoryEventBus};
use shared_crypto::{sha512_hex, Secp256k1Context, Secp256k1PublicKey};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub use config::{load_ca_public_key, ProcessorConfig, DEFAULT_CA_PUBLIC_KEY_PATH};

/// How long `shutdown` waits for the indexer to drain.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// The assembled processor.
pub struct ProcessorRuntime {
    handler: Arc<AnchorTransactionHandler>,
    state: Arc<InMemoryState>,
    bus: Arc<InMemoryEventBus>,
    indexer: Arc<AnchorIndexer<InMemoryDocumentStore>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    indexer_task: Mutex<Option<JoinHandle<()>>>,
}

impl ProcessorRuntime {
    /// Build the runtime around an already loaded CA key.
    pub fn new(config: &ProcessorConfig, trusted_ca: Secp256k1PublicKey) -> Self {
        let context = Arc::new(Secp256k1Context::new());
        let verifier = CertificateVerifier::new(context, trusted_ca);
        let handler = Arc::new(AnchorTransactionHandler::new(config.handler.clone(), verifier));

        let bus = Arc::new(InMemoryEventBus::with_capacity(config.event_bus_capacity));
        let state = Arc::new(InMemoryState::new().with_publisher(bus.clone()));

        let store = Arc::new(InMemoryDocumentStore::new(config.index.clone()));
        let indexer = Arc::new(AnchorIndexer::new(
            store,
            trusted_ca.as_hex(),
            config.handler.create_event_type(),
        ));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            family = %config.handler.family_name,
            namespace = %handler.namespace(),
            ca = %trusted_ca,
            "Processor runtime assembled"
        );

        Self {
            handler,
            state,
            bus,
            indexer,
            shutdown_tx,
            shutdown_rx,
            indexer_task: Mutex::new(None),
        }
    }

    /// Load the CA key named by `config` and build the runtime.
    pub fn from_config(config: &ProcessorConfig) -> Result<Self> {
        let trusted_ca = load_ca_public_key(&config.ca_public_key_path)?;
        Ok(Self::new(config, trusted_ca))
    }

    /// Start the indexer. Calling twice is a no-op.
    pub fn start(&self) {
        let mut task = self.indexer_task.lock();
        if task.is_some() {
            return;
        }

        // Subscribe before spawning so nothing published after `start`
        // returns is missed.
        let subscription = self.bus.subscribe(self.indexer.filter());
        let indexer = Arc::clone(&self.indexer);
        let shutdown = self.shutdown_rx.clone();

        *task = Some(tokio::spawn(async move {
            indexer
                .run(subscription, shutdown, |outcome| {
                    metric_inc!(RECORDS_INDEXED, &[outcome.as_str()]);
                })
                .await;
        }));
        info!("Processor runtime started");
    }

    /// Deliver one transaction, as the host would.
    pub async fn submit(&self, transaction: RawTransaction) -> Result<(), AdmissionError> {
        metric_inc!(TRANSACTIONS_RECEIVED);
        let result = {
            let _timer = time_histogram!(APPLY_DURATION);
            self.state.execute(&*self.handler, &transaction)
        };

        match result {
            Ok(receipt) => {
                EVENTS_EMITTED.inc_by(receipt.events.len() as u64);
                if receipt.written.is_empty() {
                    debug!("Transaction left state unchanged");
                    return Ok(());
                }

                metric_inc!(TRANSACTIONS_ADMITTED);
                let hash = sha512_hex(&transaction.payload);
                for address in receipt.written {
                    self.bus
                        .publish(AnchorEvent::Committed {
                            address: address.to_string(),
                            hash: hash.clone(),
                            committed_at: Utc::now(),
                        })
                        .await;
                }
                Ok(())
            }
            Err(e) => {
                let kind = e.kind();
                metric_inc!(TRANSACTIONS_REJECTED, &[kind.as_str()]);
                self.bus
                    .publish(AnchorEvent::Rejected {
                        kind: kind.as_str().to_string(),
                        reason: e.to_string(),
                    })
                    .await;
                Err(e)
            }
        }
    }

    pub fn handler(&self) -> &Arc<AnchorTransactionHandler> {
        &self.handler
    }

    pub fn state(&self) -> &Arc<InMemoryState> {
        &self.state
    }

    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    pub fn store(&self) -> &Arc<InMemoryDocumentStore> {
        self.indexer.store()
    }

    pub fn indexer(&self) -> &Arc<AnchorIndexer<InMemoryDocumentStore>> {
        &self.indexer
    }

    /// Signal shutdown and wait for the indexer to stop.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        let _ = self.shutdown_tx.send(true);

        let task = self.indexer_task.lock().take();
        if let Some(task) = task {
            match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Indexer task failed"),
                Err(_) => warn!("Indexer did not stop within the grace period"),
            }
        }
        info!("Shutdown complete");
    }
}
