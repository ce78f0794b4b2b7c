//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account and balance limits
//! - `upload`: Raw records parsed from uploaded files
//! - `transfer`: Transfer requests and outcomes
//! - `error`: Error types for ingestion, persistence and transfers

pub mod account;
pub mod error;
pub mod transfer;
pub mod upload;

pub use account::{
    format_balance, parse_decimal, Account, AccountId, BALANCE_SCALE, MAX_BALANCE,
};
pub use error::{
    AppError, IngestionError, PersistenceError, StoreError, TransferError, UploadError,
};
pub use transfer::{TransferOutcome, TransferRequest};
pub use upload::{UploadRecord, REQUIRED_HEADERS};
