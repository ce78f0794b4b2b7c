//! Core business logic module
//!
//! This module contains the account ledger components:
//! - `traits` - The account store abstraction
//! - `account_store` - In-memory store with per-row locks
//! - `ingestion` - Upload parsing and insert-if-absent persistence
//! - `transfer` - Validated, atomic account-to-account transfers

pub mod account_store;
pub mod ingestion;
pub mod traits;
pub mod transfer;

pub use account_store::InMemoryAccountStore;
pub use ingestion::{persist_records, Ingestor, UploadSummary};
pub use traits::{AccountStore, CommitOutcome};
pub use transfer::TransferEngine;
