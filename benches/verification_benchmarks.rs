//! Benchmarks for the verification pipeline
//!
//! These benchmarks measure:
//! - Normalization of receipts of growing size
//! - Field extraction with and without labels to anchor on
//! - End-to-end verification, single and batched

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};

use rvp::{FieldExtractor, Normalizer, VerificationConfig, VerificationRequest, Verifier};

// ============================================================================
// Helper Functions
// ============================================================================

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 14, 5, 0).unwrap()
}

fn receipt(transaction_id: u64) -> String {
    format!(
        "Bank Misr\nTransfer completed\nTransaction ID: {}\nDate: 19-Oct-2026 14:03:00\n\
         From account: 9999 8888 7777 6666\nTo account: 1234 5678 9012 3456\n\
         To: Ahmed Ali Mohamed\nAmount: EGP 750.00",
        transaction_id
    )
}

// OCR noise without any labels, forcing every strategy chain to its end
fn unlabeled_text(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("line {} of scanned\u{200B} text   with  noise", i))
        .collect::<Vec<_>>()
        .join("\n")
}

fn requests(count: u64) -> Vec<VerificationRequest> {
    (0..count)
        .map(|i| VerificationRequest {
            raw_text: receipt(10_000_000_000 + i),
            claimed_account: "1234567890123456".to_string(),
            claimed_name: "Ahmed Ali".to_string(),
            submitted_at: now(),
        })
        .collect()
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalization");
    let normalizer = Normalizer::default();

    for lines in [10, 100, 1000].iter() {
        let text = unlabeled_text(*lines);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &text, |b, text| {
            b.iter(|| black_box(normalizer.normalize(text)));
        });
    }

    group.finish();
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");
    let normalizer = Normalizer::default();
    let extractor = FieldExtractor::default();

    let labeled = normalizer.normalize(&receipt(12_345_678_901));
    group.bench_function("labeled_receipt", |b| {
        b.iter(|| black_box(extractor.extract(&labeled)));
    });

    let unlabeled = normalizer.normalize(&unlabeled_text(100));
    group.bench_function("unlabeled_text", |b| {
        b.iter(|| black_box(extractor.extract(&unlabeled)));
    });

    group.finish();
}

fn bench_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("verification");

    group.bench_function("single", |b| {
        let raw = receipt(12_345_678_901);
        b.iter_batched(
            || Verifier::new(VerificationConfig::standard()).unwrap(),
            |verifier| black_box(verifier.verify(&raw, "1234567890123456", "Ahmed Ali", now())),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("duplicate_rejection", |b| {
        let verifier = Verifier::new(VerificationConfig::standard()).unwrap();
        let raw = receipt(12_345_678_901);
        verifier.verify(&raw, "1234567890123456", "Ahmed Ali", now());

        b.iter(|| {
            black_box(verifier.verify(&raw, "1234567890123456", "Ahmed Ali", now() + Duration::seconds(1)))
        });
    });

    for count in [10u64, 100, 1000].iter() {
        let batch = requests(*count);
        group.throughput(Throughput::Elements(*count));
        group.bench_with_input(BenchmarkId::new("batch", count), &batch, |b, batch| {
            b.iter_batched(
                || Verifier::new(VerificationConfig::standard()).unwrap(),
                |verifier| black_box(verifier.verify_batch(batch)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalization, bench_extraction, bench_verification);
criterion_main!(benches);
