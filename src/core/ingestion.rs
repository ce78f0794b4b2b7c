//! Bulk account ingestion
//!
//! This module turns parsed upload records into accounts and stores them with
//! insert-if-absent semantics, so re-uploading the same file never duplicates
//! or overwrites an account.
//!
//! The pipeline is fail-fast: every record is converted before the store is
//! touched, and a single bad row rejects the whole batch.

use crate::config::IngestionConfig;
use crate::core::traits::AccountStore;
use crate::io::csv_format::parse_upload;
use crate::types::{
    parse_decimal, Account, PersistenceError, UploadError, UploadRecord, BALANCE_SCALE,
    MAX_BALANCE,
};
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Counts reported after a successful upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSummary {
    /// Data rows read from the file
    pub parsed: usize,
    /// Accounts newly stored
    pub inserted: usize,
    /// Rows skipped because their id was already stored
    pub skipped: usize,
}

/// Upload pipeline bound to an account store
#[derive(Clone)]
pub struct Ingestor {
    store: Arc<dyn AccountStore>,
    config: IngestionConfig,
}

impl Ingestor {
    /// Create a new Ingestor writing into `store`
    pub fn new(store: Arc<dyn AccountStore>, config: IngestionConfig) -> Self {
        Ingestor { store, config }
    }

    /// Accepted formats and header options
    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }

    /// Parse and persist an uploaded file
    ///
    /// # Arguments
    ///
    /// * `bytes` - Raw file contents
    /// * `content_type` - Content type declared by the uploader
    ///
    /// # Errors
    ///
    /// - `UploadError::Ingestion` if the file type or structure is rejected
    /// - `UploadError::Persistence` if a row is invalid or the store fails
    pub fn upload(&self, bytes: &[u8], content_type: &str) -> Result<UploadSummary, UploadError> {
        let records = parse_upload(bytes, content_type, &self.config)?;
        let parsed = records.len();
        let inserted = self.persist(records)?;

        let summary = UploadSummary {
            parsed,
            inserted,
            skipped: parsed - inserted,
        };
        info!(
            content_type,
            parsed = summary.parsed,
            inserted = summary.inserted,
            skipped = summary.skipped,
            "Accounts uploaded"
        );
        Ok(summary)
    }

    /// Persist already-parsed records
    ///
    /// Returns the number of accounts inserted.
    pub fn persist(&self, records: Vec<UploadRecord>) -> Result<usize, PersistenceError> {
        persist_records(self.store.as_ref(), records)
    }
}

/// Convert records to accounts and insert the ones whose id is new
///
/// # Errors
///
/// Returns `InvalidRecord` for the first row that cannot become an account
/// (nothing is inserted in that case) and `Store` if the insert fails.
pub fn persist_records(
    store: &dyn AccountStore,
    records: Vec<UploadRecord>,
) -> Result<usize, PersistenceError> {
    let accounts = build_accounts(records)?;
    Ok(store.insert_many_ignore_duplicates(accounts)?)
}

/// Convert every record, stopping at the first invalid one
///
/// Errors name the record's row in its source file. Records built by hand
/// carry no row and are numbered by position instead.
pub fn build_accounts(records: Vec<UploadRecord>) -> Result<Vec<Account>, PersistenceError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let row = record.row.unwrap_or(index + 1);
            account_from_record(row, record)
        })
        .collect()
}

/// Build one account from a raw record
///
/// - A missing, blank or non-UUID id is replaced by a freshly generated one
/// - A missing name becomes the empty string
/// - The balance must parse as a decimal; it is rounded half away from zero
///   to two fraction digits and must not exceed 99999999.99 in magnitude
///
/// `row` is the data row number used in error messages (the header is row 0).
pub fn account_from_record(row: usize, record: UploadRecord) -> Result<Account, PersistenceError> {
    let id = record
        .id
        .as_deref()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .unwrap_or_else(Uuid::new_v4);

    let balance = parse_balance(record.balance.as_deref())
        .map_err(|message| PersistenceError::invalid_record(row, message))?;

    Ok(Account::new(id, record.name.unwrap_or_default(), balance))
}

fn parse_balance(raw: Option<&str>) -> Result<Decimal, String> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err("balance is missing".to_string());
    }

    let balance = parse_decimal(raw)
        .ok_or_else(|| format!("balance '{}' is not a decimal number", raw))?
        .round_dp_with_strategy(BALANCE_SCALE, RoundingStrategy::MidpointAwayFromZero);

    if balance.abs() > MAX_BALANCE {
        return Err(format!(
            "balance '{}' exceeds the maximum of {}",
            raw, MAX_BALANCE
        ));
    }

    Ok(balance)
}
