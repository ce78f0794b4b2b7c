//! Account-to-account transfer engine
//!
//! This module provides the TransferEngine that validates a transfer request
//! and applies it atomically through the account store.
//!
//! The engine enforces these rules, in order, and reports the first failure:
//! - All parameters are present
//! - Both accounts exist (source first)
//! - The amount is a non-negative decimal with at most two fraction digits
//! - Source and destination differ
//! - The source balance covers the amount
//!
//! Both balances are written by a single versioned commit. If another writer
//! touched either account between the read and the commit, the whole
//! read-validate-commit cycle is repeated up to `max_retries` times.

use crate::config::TransferConfig;
use crate::core::traits::{AccountStore, CommitOutcome};
use crate::types::{
    parse_decimal, Account, AccountId, StoreError, TransferError, TransferOutcome,
    TransferRequest, BALANCE_SCALE, MAX_BALANCE,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Validated transfer parameters, still unresolved against the store
struct TransferParams<'a> {
    from_id: &'a str,
    to_id: &'a str,
    amount: &'a str,
}

/// Transfer engine bound to an account store
#[derive(Clone)]
pub struct TransferEngine {
    store: Arc<dyn AccountStore>,
    config: TransferConfig,
}

impl TransferEngine {
    /// Create a new TransferEngine operating on `store`
    pub fn new(store: Arc<dyn AccountStore>, config: TransferConfig) -> Self {
        TransferEngine { store, config }
    }

    /// Move `amount` from one account to another
    ///
    /// # Arguments
    ///
    /// * `request` - Raw source id, destination id and amount
    ///
    /// # Returns
    ///
    /// Both accounts as committed, carrying their new balances.
    ///
    /// # Errors
    ///
    /// - `MissingParameters` if any parameter is absent or blank
    /// - `AccountNotFound` if either id is not a known account
    /// - `InvalidAmount` if the amount is negative, not a number, or has more
    ///   than two fraction digits
    /// - `SelfTransfer` if both ids name the same account
    /// - `InsufficientBalance` if the source balance is below the amount
    /// - `TransferFailed` if the destination would exceed the balance limit,
    ///   the store fails, or every commit attempt lost a concurrent race
    pub fn transfer(&self, request: &TransferRequest) -> Result<TransferOutcome, TransferError> {
        let params = required_params(request)?;

        for attempt in 0..=self.config.max_retries {
            let (from, to, amount) = self.prepare(&params)?;

            match self.store.commit_pair(&from, &to) {
                Ok(CommitOutcome::Committed { first, second }) => {
                    info!(
                        from = %first.id,
                        to = %second.id,
                        amount = %amount,
                        "Transfer committed"
                    );
                    return Ok(TransferOutcome {
                        from: first,
                        to: second,
                    });
                }
                Ok(CommitOutcome::Conflict) => {
                    debug!(
                        attempt,
                        from = %from.id,
                        to = %to.id,
                        "Transfer lost a race, retrying"
                    );
                }
                Err(e) => return Err(store_failure(e)),
            }
        }

        warn!(
            from = params.from_id,
            to = params.to_id,
            retries = self.config.max_retries,
            "Transfer abandoned after repeated conflicts"
        );
        Err(TransferError::failed(
            "accounts were modified concurrently, please retry",
        ))
    }

    /// Read both accounts and compute their post-transfer state
    ///
    /// The returned accounts keep the versions they were read at, so the
    /// commit only succeeds if nothing changed in between.
    fn prepare(
        &self,
        params: &TransferParams,
    ) -> Result<(Account, Account, Decimal), TransferError> {
        let mut from = self.load(params.from_id)?;
        let mut to = self.load(params.to_id)?;

        let amount = parse_amount(params.amount)?;

        if from.id == to.id {
            return Err(TransferError::SelfTransfer);
        }

        if from.balance < amount {
            return Err(TransferError::insufficient_balance(from.balance, amount));
        }

        let new_from = from
            .balance
            .checked_sub(amount)
            .ok_or_else(|| TransferError::failed("source balance underflow"))?;
        let new_to = to
            .balance
            .checked_add(amount)
            .filter(|balance| *balance <= MAX_BALANCE)
            .ok_or_else(|| {
                TransferError::failed(format!(
                    "destination balance would exceed the maximum of {}",
                    MAX_BALANCE
                ))
            })?;

        from.balance = new_from;
        to.balance = new_to;
        Ok((from, to, amount))
    }

    fn load(&self, raw_id: &str) -> Result<Account, TransferError> {
        let id = AccountId::parse_str(raw_id)
            .map_err(|_| TransferError::account_not_found(raw_id))?;

        match self.store.get(&id) {
            Ok(Some(account)) => Ok(account),
            Ok(None) => Err(TransferError::account_not_found(raw_id)),
            Err(e) => Err(store_failure(e)),
        }
    }
}

fn store_failure(error: StoreError) -> TransferError {
    warn!(error = %error, "Account store failed during transfer");
    TransferError::failed(error.to_string())
}

fn required_params(request: &TransferRequest) -> Result<TransferParams<'_>, TransferError> {
    fn present(value: &Option<String>) -> Option<&str> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    match (
        present(&request.from_id),
        present(&request.to_id),
        present(&request.amount),
    ) {
        (Some(from_id), Some(to_id), Some(amount)) => Ok(TransferParams {
            from_id,
            to_id,
            amount,
        }),
        _ => Err(TransferError::MissingParameters),
    }
}

/// Parse a transfer amount
///
/// Accepts non-negative decimals with at most two significant fraction
/// digits, so `10.50` and `10.500` are fine but `10.505` and `1_000` are not.
pub fn parse_amount(raw: &str) -> Result<Decimal, TransferError> {
    let amount = parse_decimal(raw).ok_or_else(|| TransferError::invalid_amount(raw))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(TransferError::invalid_amount(raw));
    }
    if amount.normalize().scale() > BALANCE_SCALE {
        return Err(TransferError::invalid_amount(raw));
    }

    Ok(amount.abs().round_dp(BALANCE_SCALE))
}
