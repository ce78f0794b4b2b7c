//! Benchmark suite for upload ingestion and transfers
//!
//! Uses the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//! ```
//!
//! Upload content is generated in memory for each size, in both CSV and
//! tab-delimited form, so no fixture files are needed.

use account_ledger::config::{IngestionConfig, TransferConfig};
use account_ledger::core::{AccountStore, InMemoryAccountStore, Ingestor, TransferEngine};
use account_ledger::io::parse_upload;
use account_ledger::types::TransferRequest;
use std::sync::Arc;

fn main() {
    divan::main();
}

const SIZES: &[usize] = &[100, 1_000, 100_000];

/// Build an upload with `rows` accounts and deterministic ids
fn generate_upload(rows: usize, delimiter: char) -> String {
    let mut content = format!("ID{d}Name{d}Balance\n", d = delimiter);
    for row in 0..rows {
        content.push_str(&format!(
            "00000000-0000-4000-8000-{row:012x}{d}Account {row}{d}{balance}.{cents:02}\n",
            d = delimiter,
            balance = row % 100_000,
            cents = row % 100,
        ));
    }
    content
}

/// Parse CSV uploads without persisting
#[divan::bench(args = SIZES)]
fn parse_csv(bencher: divan::Bencher, rows: usize) {
    let content = generate_upload(rows, ',');
    let config = IngestionConfig::default();

    bencher.bench(|| {
        parse_upload(content.as_bytes(), "text/csv", &config).expect("Parsing failed")
    });
}

/// Parse tab-delimited uploads without persisting
#[divan::bench(args = SIZES)]
fn parse_tab_delimited(bencher: divan::Bencher, rows: usize) {
    let content = generate_upload(rows, '\t');
    let config = IngestionConfig::default();

    bencher.bench(|| {
        parse_upload(content.as_bytes(), "text/plain", &config).expect("Parsing failed")
    });
}

/// Parse and persist into an empty store
#[divan::bench(args = SIZES)]
fn upload_into_empty_store(bencher: divan::Bencher, rows: usize) {
    let content = generate_upload(rows, ',');

    bencher
        .with_inputs(|| {
            let store = Arc::new(InMemoryAccountStore::new());
            Ingestor::new(store, IngestionConfig::default())
        })
        .bench_values(|ingestor| {
            ingestor
                .upload(content.as_bytes(), "text/csv")
                .expect("Upload failed")
        });
}

/// Re-upload a file whose ids are all stored already
#[divan::bench(args = SIZES)]
fn reupload_existing(bencher: divan::Bencher, rows: usize) {
    let content = generate_upload(rows, ',');
    let store = Arc::new(InMemoryAccountStore::new());
    let ingestor = Ingestor::new(store, IngestionConfig::default());
    ingestor
        .upload(content.as_bytes(), "text/csv")
        .expect("Upload failed");

    bencher.bench(|| {
        ingestor
            .upload(content.as_bytes(), "text/csv")
            .expect("Upload failed")
    });
}

/// Transfer back and forth between two accounts
#[divan::bench]
fn transfer_round_trip(bencher: divan::Bencher) {
    let store = Arc::new(InMemoryAccountStore::new());
    let ingestor = Ingestor::new(store.clone(), IngestionConfig::default());
    ingestor
        .upload(generate_upload(2, ',').as_bytes(), "text/csv")
        .expect("Upload failed");
    let ids: Vec<String> = store
        .find_by_name_contains("")
        .expect("Listing failed")
        .iter()
        .map(|account| account.id.to_string())
        .collect();
    let engine = TransferEngine::new(store, TransferConfig::default());
    let there = TransferRequest::new(ids[1].clone(), ids[0].clone(), "0.50");
    let back = TransferRequest::new(ids[0].clone(), ids[1].clone(), "0.50");

    bencher.bench(|| {
        engine.transfer(&there).expect("Transfer failed");
        engine.transfer(&back).expect("Transfer failed");
    });
}
