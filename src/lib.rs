//! Account Ledger Library
//! # Overview
//!
//! This library ingests account lists from uploaded CSV or tab-delimited files
//! and moves balances between accounts with atomic, validated transfers.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, UploadRecord, TransferRequest, errors)
//! - [`config`] - Runtime configuration
//! - [`cli`] - CLI arguments parsing
//! - [`io`] - Upload format detection, header validation and CSV output
//! - [`core`] - Business logic components:
//!   - [`core::traits`] - The account store abstraction
//!   - [`core::account_store`] - In-memory store with per-row locking
//!   - [`core::ingestion`] - Insert-if-absent persistence of uploaded records
//!   - [`core::transfer`] - Validated account-to-account transfers
//! - [`pipeline`] - File-based validation and seeding for the CLI
//! - [`web`] - JSON HTTP surface
//!
//! # Uploads
//!
//! An upload must start with the header `ID,Name,Balance` (CSV, in order) or
//! the same three names in any order (tab-delimited text). Accounts whose id
//! is already stored are skipped, so re-uploading a file is harmless.
//!
//! # Transfers
//!
//! A transfer is checked in a fixed order: parameters present, both accounts
//! exist, amount valid, accounts differ, balance sufficient. Both balances are
//! then written together or not at all.

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod pipeline;
pub mod types;
pub mod web;

pub use core::{AccountStore, InMemoryAccountStore, Ingestor, TransferEngine};
pub use io::write_accounts_csv;
pub use types::{
    Account, AccountId, AppError, IngestionError, PersistenceError, TransferError,
    TransferOutcome, TransferRequest, UploadError, UploadRecord,
};
