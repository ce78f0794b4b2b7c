//! Core traits for account storage
//!
//! This module defines the account store abstraction the ingestion pipeline
//! and the transfer engine are written against. Any backend (in-memory map,
//! embedded database, relational engine) can implement it.

use crate::types::{Account, AccountId, StoreError};

/// Result of a versioned two-row commit
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// Both rows were written; carries the rows as now stored
    Committed { first: Account, second: Account },

    /// At least one row changed since it was read; nothing was written
    Conflict,
}

/// Persistent account table keyed by id
///
/// Implementations must be safe to share across threads. Every method
/// reports backend failures as `StoreError` instead of panicking.
pub trait AccountStore: Send + Sync {
    /// Get an account by id
    fn get(&self, id: &AccountId) -> Result<Option<Account>, StoreError>;

    /// Accounts whose name contains `query`, ignoring case
    ///
    /// An empty query returns every account. Results are sorted by name,
    /// then id.
    fn find_by_name_contains(&self, query: &str) -> Result<Vec<Account>, StoreError>;

    /// Insert accounts whose id is not yet stored, skipping the rest
    ///
    /// Returns the number of accounts actually inserted. When the same id
    /// appears twice in `accounts` the first occurrence wins.
    fn insert_many_ignore_duplicates(&self, accounts: Vec<Account>) -> Result<usize, StoreError>;

    /// Overwrite the name and balance of an existing account
    fn update(&self, account: &Account) -> Result<(), StoreError>;

    /// Write two different accounts together, or neither
    ///
    /// Each argument carries the new name/balance and the `version` it was
    /// read at. The write happens only if both stored versions still match;
    /// otherwise `CommitOutcome::Conflict` is returned and nothing changes.
    fn commit_pair(&self, first: &Account, second: &Account) -> Result<CommitOutcome, StoreError>;
}
