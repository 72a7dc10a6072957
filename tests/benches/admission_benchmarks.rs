//! # Air Anchor Admission Benchmarks
//!
//! | Stage | Target |
//! |-------|--------|
//! | Canonical encode + sha512 | < 50μs |
//! | CA countersignature check | < 1ms |
//! | Full apply against in-memory state | < 2ms |

use aa_01_anchor_processor::{
    authorize, AnchorTransactionHandler, CertificateAuthority, CertificateRequest,
    CertificateVerifier, HandlerConfig, InMemoryState, RawTransaction, TransactionPayload,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_crypto::{Secp256k1Context, Signer};
use std::sync::Arc;
use std::time::Duration;

fn build_payload(context: &Secp256k1Context, ca: &CertificateAuthority<'_>, data: &str) -> TransactionPayload {
    let device = Signer::new(context, context.new_random_private_key());
    let request = CertificateRequest::create("bench-device", &device).expect("request");
    let ca_signature = ca.countersign(&request).expect("countersign");
    TransactionPayload::create(&device, request, ca_signature, data)
}

fn bench_payload_hash(c: &mut Criterion) {
    let context = Secp256k1Context::new();
    let ca = CertificateAuthority::new(Signer::new(&context, context.new_random_private_key()));

    let mut group = c.benchmark_group("aa-01-payload-hash");
    for size in [16usize, 256, 4096] {
        let payload = build_payload(&context, &ca, &"x".repeat(size));
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("encode_and_hash", size), &payload, |b, p| {
            b.iter(|| black_box(p.hash().expect("hash")))
        });
    }
    group.finish();
}

fn bench_authorize(c: &mut Criterion) {
    let context = Secp256k1Context::new();
    let ca = CertificateAuthority::new(Signer::new(&context, context.new_random_private_key()));
    let ca_public_key = ca.public_key();
    let payload = build_payload(&context, &ca, "location=51.5,-0.1");

    let mut group = c.benchmark_group("aa-01-verification");
    group.measurement_time(Duration::from_secs(10));
    group.bench_function("authorize", |b| {
        b.iter(|| black_box(authorize(&context, &payload, &ca_public_key).is_ok()))
    });
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let context = Arc::new(Secp256k1Context::new());
    let ca_key = context.new_random_private_key();
    let ca = CertificateAuthority::new(Signer::new(&context, ca_key.clone()));
    let verifier = CertificateVerifier::new(Arc::clone(&context), context.get_public_key(&ca_key));
    let handler = AnchorTransactionHandler::new(HandlerConfig::default(), verifier);

    let transactions: Vec<RawTransaction> = (0..256)
        .map(|i| {
            let payload = build_payload(&context, &ca, &format!("location={i},0"));
            RawTransaction::new(
                "locationKey",
                "1.0",
                payload.batcher_public_key.clone(),
                payload.serialize().expect("serialize"),
            )
        })
        .collect();

    let mut group = c.benchmark_group("aa-01-apply");
    group.throughput(Throughput::Elements(transactions.len() as u64));
    group.bench_function("apply_batch_fresh_state", |b| {
        b.iter(|| {
            let state = InMemoryState::new();
            for tx in &transactions {
                black_box(state.execute(&handler, tx).is_ok());
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_payload_hash, bench_authorize, bench_apply);
criterion_main!(benches);
