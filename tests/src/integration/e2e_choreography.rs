//! # End-to-End Choreography Tests
//!
//! Full processor flow through `ProcessorRuntime`:
//!
//! ```text
//! submit(tx) ──► [InMemoryState] ──► AnchorTransactionHandler
//!                      │ commit
//!                      ↓
//!        locationKey/create ──→ [Event Bus] ──→ [AnchorIndexer] ── create
//!        Committed         ──→ [Event Bus] ──→ [AnchorIndexer] ── set_confirmed
//!        Rejected          ──→ [Event Bus] ──→ audit subscribers
//! ```

#[cfg(test)]
mod tests {
    use crate::fixtures::{Fixture, LOCATION};
    use aa_01_anchor_processor::{AdmissionErrorKind, InMemoryState};
    use aa_02_anchor_indexing::{DocumentStore, RecordQuery};
    use anchor_telemetry::{gather_metrics, register_metrics};
    use processor_runtime::{ProcessorConfig, ProcessorRuntime};
    use shared_bus::{AnchorEvent, EventFilter, EventTopic};
    use shared_crypto::sha512_hex;
    use std::io::Write;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tokio::time::timeout;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn runtime(f: &Fixture) -> ProcessorRuntime {
        ProcessorRuntime::new(&ProcessorConfig::default(), f.ca_public_key())
    }

    async fn wait_until<F: Fn() -> bool>(condition: F) {
        timeout(Duration::from_secs(2), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    // =============================================================================
    // HAPPY PATH
    // =============================================================================

    #[tokio::test]
    async fn test_admission_creates_then_confirms_record() {
        let f = Fixture::new();
        let runtime = runtime(&f);
        runtime.start();

        let payload = f.payload(LOCATION).unwrap();
        let tx = f.transaction(&payload).unwrap();
        let hash = sha512_hex(&tx.payload);
        runtime.submit(tx).await.unwrap();

        let stats = runtime.indexer().stats();
        wait_until(|| stats.confirmed.load(Ordering::Relaxed) == 1).await;

        let record = runtime.store().find_by_hash(&hash).await.unwrap().unwrap();
        assert_eq!(record.sender, f.device_public_key().as_hex());
        assert_eq!(record.signer, payload.batcher_public_key);
        assert_eq!(record.ca, f.ca_public_key().as_hex());
        assert!(record.is_confirmed());

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_bus_carries_create_then_commit() {
        let f = Fixture::new();
        let runtime = runtime(&f);
        let mut sub = runtime
            .bus()
            .subscribe(EventFilter::topics(vec![EventTopic::Ledger, EventTopic::Commit]));

        let tx = f.transaction(&f.payload(LOCATION).unwrap()).unwrap();
        let hash = sha512_hex(&tx.payload);
        runtime.submit(tx).await.unwrap();

        let created = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout waiting for event")
            .expect("should receive event");
        match &created {
            AnchorEvent::Ledger {
                event_type,
                attributes,
                data,
            } => {
                assert_eq!(event_type, "locationKey/create");
                let keys: Vec<&str> = attributes.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["sender", "hash", "signer"]);
                assert_eq!(created.attribute("hash"), Some(hash.as_str()));
                assert!(data.is_empty());
            }
            other => panic!("Expected ledger event, got {:?}", other),
        }

        let committed = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout waiting for event")
            .expect("should receive event");
        match committed {
            AnchorEvent::Committed {
                hash: committed_hash,
                address,
                ..
            } => {
                assert_eq!(committed_hash, hash);
                assert!(address.starts_with("c08ba9"));
            }
            other => panic!("Expected commit event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrent_devices_indexed_by_sender() {
        let ca = Fixture::new();
        let runtime = std::sync::Arc::new(runtime(&ca));
        runtime.start();

        let mut handles = Vec::new();
        for i in 0..4 {
            let mut device = Fixture::new();
            device.ca_key = ca.ca_key.clone();
            let runtime = std::sync::Arc::clone(&runtime);
            handles.push(tokio::spawn(async move {
                for n in 0..3 {
                    let tx = device
                        .transaction(&device.payload(&format!("location={i},{n}")).unwrap())
                        .unwrap();
                    runtime.submit(tx).await.unwrap();
                }
                device.device_public_key().as_hex()
            }));
        }

        let mut senders = Vec::new();
        for handle in handles {
            senders.push(handle.await.unwrap());
        }

        let stats = runtime.indexer().stats();
        wait_until(|| stats.confirmed.load(Ordering::Relaxed) == 12).await;

        for sender in &senders {
            let records = runtime.store().find_all_by_sender(sender).await.unwrap();
            assert_eq!(records.len(), 3);
        }
        assert_eq!(runtime.state().snapshot().unwrap().len(), 12);

        runtime.shutdown().await;
    }

    // =============================================================================
    // REJECTIONS
    // =============================================================================

    #[tokio::test]
    async fn test_rejection_reaches_audit_trail_only() {
        let f = Fixture::new();
        let runtime = runtime(&f);
        let mut audit = runtime
            .bus()
            .subscribe(EventFilter::topics(vec![EventTopic::Rejection]));
        runtime.start();

        let rogue = f.context.new_random_private_key();
        let tx = f
            .transaction(&f.payload_signed_by(&rogue, LOCATION).unwrap())
            .unwrap();
        let err = runtime.submit(tx).await.unwrap_err();
        assert_eq!(err.kind(), AdmissionErrorKind::InvalidCertificate);

        match audit.recv().await {
            Some(AnchorEvent::Rejected { kind, .. }) => assert_eq!(kind, "invalid_certificate"),
            other => panic!("Expected rejection, got {:?}", other),
        }

        assert!(runtime.state().snapshot().unwrap().is_empty());
        assert!(runtime
            .store()
            .find(&RecordQuery::all())
            .await
            .unwrap()
            .is_empty());

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_rejections_counted_by_kind() {
        register_metrics().unwrap();
        let f = Fixture::new();
        let runtime = runtime(&f);

        let tx = f.raw_transaction(b"{\"not\":\"a payload\"}".to_vec());
        runtime.submit(tx).await.unwrap_err();

        let text = gather_metrics().unwrap();
        assert!(text.contains("aa_processor_transactions_rejected_total"));
        assert!(text.contains("kind=\"malformed_payload\""));
    }

    #[test]
    fn test_event_failure_does_not_block_admission() {
        let f = Fixture::new();
        let handler = f.handler();
        let state = InMemoryState::new().rejecting_events();

        let receipt = state
            .execute(&handler, &f.transaction(&f.payload(LOCATION).unwrap()).unwrap())
            .unwrap();

        assert_eq!(receipt.written.len(), 1);
        assert!(receipt.events.is_empty());
    }

    #[test]
    fn test_refused_write_is_internal_and_leaves_state() {
        let f = Fixture::new();
        let handler = f.handler();
        let state = InMemoryState::new().rejecting_writes();

        let err = state
            .execute(&handler, &f.transaction(&f.payload(LOCATION).unwrap()).unwrap())
            .unwrap_err();

        assert!(err.is_internal());
        assert!(state.snapshot().unwrap().is_empty());
    }

    // =============================================================================
    // BOOTSTRAP
    // =============================================================================

    #[tokio::test]
    async fn test_runtime_from_key_file() {
        let f = Fixture::new();
        let mut key_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(key_file, "{}", f.ca_public_key().as_hex()).unwrap();

        let config = ProcessorConfig {
            ca_public_key_path: key_file.path().to_path_buf(),
            ..ProcessorConfig::default()
        };
        let runtime = ProcessorRuntime::from_config(&config).unwrap();

        let tx = f.transaction(&f.payload(LOCATION).unwrap()).unwrap();
        runtime.submit(tx).await.unwrap();
        assert_eq!(runtime.handler().verifier().trusted_ca(), &f.ca_public_key());
    }

    #[test]
    fn test_runtime_refuses_missing_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProcessorConfig {
            ca_public_key_path: dir.path().join("ca.pub"),
            ..ProcessorConfig::default()
        };

        assert!(ProcessorRuntime::from_config(&config).is_err());
    }
}
