//! Thread-safe in-memory account store
//!
//! This module provides the `InMemoryAccountStore`, an `AccountStore`
//! implementation backed by concurrent data structures.
//!
//! # Design
//!
//! Accounts live in a `DashMap` (a sharded concurrent HashMap) keyed by id.
//! Each value is an `Arc<Mutex<Account>>`, so every account row has its own
//! lock:
//! - Map shard locks are only held long enough to find or insert a row
//! - Row mutexes serialize writers of the same account
//! - Paired commits lock both rows in ascending id order, so two commits over
//!   the same pair can never deadlock
//!
//! # Versioning
//!
//! Every write increments the row's `version`. `commit_pair` compares the
//! versions the caller read against the stored ones while holding both row
//! locks, which gives the transfer engine compare-and-swap semantics.

use crate::core::traits::{AccountStore, CommitOutcome};
use crate::types::{Account, AccountId, StoreError};
use dashmap::DashMap;
use std::sync::{Arc, Mutex, MutexGuard};

type Row = Arc<Mutex<Account>>;

/// In-memory account table with per-row locking
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    /// Account rows by id
    accounts: DashMap<AccountId, Row>,
}

impl InMemoryAccountStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the store holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Clone the row handle out of the map, releasing the shard lock
    fn row(&self, id: &AccountId) -> Option<Row> {
        self.accounts.get(id).map(|entry| Arc::clone(entry.value()))
    }
}

fn lock_row<'a>(
    id: &AccountId,
    row: &'a Mutex<Account>,
) -> Result<MutexGuard<'a, Account>, StoreError> {
    row.lock().map_err(|_| StoreError::Poisoned { id: *id })
}

impl AccountStore for InMemoryAccountStore {
    fn get(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        let Some(row) = self.row(id) else {
            return Ok(None);
        };
        let account = lock_row(id, &row)?.clone();
        Ok(Some(account))
    }

    fn find_by_name_contains(&self, query: &str) -> Result<Vec<Account>, StoreError> {
        let needle = query.to_lowercase();

        let rows: Vec<(AccountId, Row)> = self
            .accounts
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();

        let mut matches = Vec::new();
        for (id, row) in rows {
            let account = lock_row(&id, &row)?;
            if account.name.to_lowercase().contains(&needle) {
                matches.push(account.clone());
            }
        }

        matches.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(matches)
    }

    fn insert_many_ignore_duplicates(&self, accounts: Vec<Account>) -> Result<usize, StoreError> {
        let mut inserted = 0;

        for mut account in accounts {
            account.version = 0;
            let mut fresh = false;
            self.accounts.entry(account.id).or_insert_with(|| {
                fresh = true;
                Arc::new(Mutex::new(account))
            });
            if fresh {
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    fn update(&self, account: &Account) -> Result<(), StoreError> {
        let row = self
            .row(&account.id)
            .ok_or(StoreError::NotFound { id: account.id })?;
        let mut stored = lock_row(&account.id, &row)?;

        stored.name = account.name.clone();
        stored.balance = account.balance;
        stored.version += 1;

        Ok(())
    }

    fn commit_pair(&self, first: &Account, second: &Account) -> Result<CommitOutcome, StoreError> {
        if first.id == second.id {
            return Err(StoreError::SameRow { id: first.id });
        }

        let first_row = self
            .row(&first.id)
            .ok_or(StoreError::NotFound { id: first.id })?;
        let second_row = self
            .row(&second.id)
            .ok_or(StoreError::NotFound { id: second.id })?;

        // Lock in ascending id order
        let (mut first_stored, mut second_stored);
        if first.id < second.id {
            first_stored = lock_row(&first.id, &first_row)?;
            second_stored = lock_row(&second.id, &second_row)?;
        } else {
            second_stored = lock_row(&second.id, &second_row)?;
            first_stored = lock_row(&first.id, &first_row)?;
        }

        if first_stored.version != first.version || second_stored.version != second.version {
            return Ok(CommitOutcome::Conflict);
        }

        first_stored.name = first.name.clone();
        first_stored.balance = first.balance;
        first_stored.version += 1;

        second_stored.name = second.name.clone();
        second_stored.balance = second.balance;
        second_stored.version += 1;

        Ok(CommitOutcome::Committed {
            first: first_stored.clone(),
            second: second_stored.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::thread;
    use uuid::Uuid;

    fn account(name: &str, balance: i64) -> Account {
        Account::new(Uuid::new_v4(), name, Decimal::new(balance, 0))
    }

    #[test]
    fn test_new_creates_empty_store() {
        let store = InMemoryAccountStore::new();
        assert!(store.is_empty());
        assert_eq!(store.find_by_name_contains("").unwrap().len(), 0);
    }

    #[test]
    fn test_get_returns_none_for_unknown_id() {
        let store = InMemoryAccountStore::new();
        assert_eq!(store.get(&Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn test_insert_then_get() {
        let store = InMemoryAccountStore::new();
        let joy = account("Joy Dean", 100);

        let inserted = store.insert_many_ignore_duplicates(vec![joy.clone()]).unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(store.get(&joy.id).unwrap(), Some(joy));
    }

    #[test]
    fn test_insert_skips_existing_ids_without_overwriting() {
        let store = InMemoryAccountStore::new();
        let joy = account("Joy Dean", 100);
        store.insert_many_ignore_duplicates(vec![joy.clone()]).unwrap();

        let mut renamed = joy.clone();
        renamed.name = "Someone Else".to_string();
        let inserted = store
            .insert_many_ignore_duplicates(vec![renamed, account("Bryan Rice", 5)])
            .unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&joy.id).unwrap().unwrap().name, "Joy Dean");
    }

    #[test]
    fn test_insert_keeps_first_duplicate_within_batch() {
        let store = InMemoryAccountStore::new();
        let first = account("First", 1);
        let mut second = first.clone();
        second.name = "Second".to_string();

        let inserted = store.insert_many_ignore_duplicates(vec![first.clone(), second]).unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(store.get(&first.id).unwrap().unwrap().name, "First");
    }

    #[test]
    fn test_insert_resets_version() {
        let store = InMemoryAccountStore::new();
        let mut joy = account("Joy", 1);
        joy.version = 42;

        store.insert_many_ignore_duplicates(vec![joy.clone()]).unwrap();

        assert_eq!(store.get(&joy.id).unwrap().unwrap().version, 0);
    }

    #[test]
    fn test_find_by_name_contains_is_case_insensitive() {
        let store = InMemoryAccountStore::new();
        let target = account("Search Account 1", 150);
        store
            .insert_many_ignore_duplicates(vec![target.clone(), account("Other Account", 300)])
            .unwrap();

        let found = store.find_by_name_contains("search").unwrap();

        assert_eq!(found, vec![target]);
    }

    #[test]
    fn test_find_by_name_contains_empty_query_returns_all_sorted() {
        let store = InMemoryAccountStore::new();
        store
            .insert_many_ignore_duplicates(vec![account("Zed", 1), account("Amy", 2), account("Max", 3)])
            .unwrap();

        let names: Vec<String> = store
            .find_by_name_contains("")
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();

        assert_eq!(names, ["Amy", "Max", "Zed"]);
    }

    #[test]
    fn test_find_by_name_contains_no_match() {
        let store = InMemoryAccountStore::new();
        store.insert_many_ignore_duplicates(vec![account("Joy", 1)]).unwrap();

        assert!(store.find_by_name_contains("nonexistent").unwrap().is_empty());
    }

    #[test]
    fn test_update_overwrites_and_bumps_version() {
        let store = InMemoryAccountStore::new();
        let mut joy = account("Joy", 100);
        store.insert_many_ignore_duplicates(vec![joy.clone()]).unwrap();

        joy.balance = Decimal::new(250, 0);
        store.update(&joy).unwrap();

        let stored = store.get(&joy.id).unwrap().unwrap();
        assert_eq!(stored.balance, Decimal::new(250, 0));
        assert_eq!(stored.version, 1);
    }

    #[test]
    fn test_update_unknown_account_fails() {
        let store = InMemoryAccountStore::new();
        let ghost = account("Ghost", 0);

        let result = store.update(&ghost);

        assert_eq!(result, Err(StoreError::NotFound { id: ghost.id }));
    }

    #[test]
    fn test_commit_pair_writes_both_rows() {
        let store = InMemoryAccountStore::new();
        let a = account("A", 500);
        let b = account("B", 300);
        store.insert_many_ignore_duplicates(vec![a.clone(), b.clone()]).unwrap();

        let mut new_a = store.get(&a.id).unwrap().unwrap();
        let mut new_b = store.get(&b.id).unwrap().unwrap();
        new_a.balance = Decimal::new(400, 0);
        new_b.balance = Decimal::new(400, 0);

        let outcome = store.commit_pair(&new_a, &new_b).unwrap();

        let CommitOutcome::Committed { first, second } = outcome else {
            panic!("expected a committed outcome");
        };
        assert_eq!(first.balance, Decimal::new(400, 0));
        assert_eq!(second.balance, Decimal::new(400, 0));
        assert_eq!(first.version, 1);
        assert_eq!(second.version, 1);
        assert_eq!(store.get(&a.id).unwrap().unwrap(), first);
        assert_eq!(store.get(&b.id).unwrap().unwrap(), second);
    }

    #[test]
    fn test_commit_pair_with_stale_version_writes_nothing() {
        let store = InMemoryAccountStore::new();
        let a = account("A", 500);
        let b = account("B", 300);
        store.insert_many_ignore_duplicates(vec![a.clone(), b.clone()]).unwrap();

        // Someone else writes B after we read it
        let mut concurrent_b = b.clone();
        concurrent_b.balance = Decimal::new(1, 0);
        store.update(&concurrent_b).unwrap();

        let mut new_a = a.clone();
        let mut new_b = b.clone();
        new_a.balance = Decimal::new(400, 0);
        new_b.balance = Decimal::new(400, 0);

        let outcome = store.commit_pair(&new_a, &new_b).unwrap();

        assert_eq!(outcome, CommitOutcome::Conflict);
        assert_eq!(store.get(&a.id).unwrap().unwrap().balance, Decimal::new(500, 0));
        assert_eq!(store.get(&b.id).unwrap().unwrap().balance, Decimal::new(1, 0));
    }

    #[test]
    fn test_commit_pair_rejects_same_row() {
        let store = InMemoryAccountStore::new();
        let a = account("A", 500);
        store.insert_many_ignore_duplicates(vec![a.clone()]).unwrap();

        assert_eq!(store.commit_pair(&a, &a), Err(StoreError::SameRow { id: a.id }));
    }

    #[test]
    fn test_commit_pair_unknown_row_fails() {
        let store = InMemoryAccountStore::new();
        let a = account("A", 500);
        let ghost = account("Ghost", 0);
        store.insert_many_ignore_duplicates(vec![a.clone()]).unwrap();

        assert_eq!(
            store.commit_pair(&a, &ghost),
            Err(StoreError::NotFound { id: ghost.id })
        );
    }

    #[test]
    fn test_concurrent_inserts_of_same_id_insert_once() {
        let store = Arc::new(InMemoryAccountStore::new());
        let shared = account("Shared", 10);

        let total: usize = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let store = Arc::clone(&store);
                    let shared = shared.clone();
                    scope.spawn(move || store.insert_many_ignore_duplicates(vec![shared]).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(total, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_opposite_order_commits_do_not_deadlock() {
        let store = Arc::new(InMemoryAccountStore::new());
        let a = account("A", 1_000);
        let b = account("B", 1_000);
        store.insert_many_ignore_duplicates(vec![a.clone(), b.clone()]).unwrap();

        thread::scope(|scope| {
            for i in 0..4 {
                let store = Arc::clone(&store);
                let (x, y) = if i % 2 == 0 { (a.id, b.id) } else { (b.id, a.id) };
                scope.spawn(move || {
                    for _ in 0..200 {
                        let first = store.get(&x).unwrap().unwrap();
                        let second = store.get(&y).unwrap().unwrap();
                        let _ = store.commit_pair(&first, &second).unwrap();
                    }
                });
            }
        });

        let a_now = store.get(&a.id).unwrap().unwrap();
        let b_now = store.get(&b.id).unwrap().unwrap();
        assert_eq!(a_now.version, b_now.version);
    }
}
