//! Account-related types for the account ledger
//!
//! This module defines the Account structure stored by the account store
//! together with the balance limits shared by ingestion and transfers.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::str::FromStr;
use uuid::Uuid;

/// Account identifier
///
/// Rendered as a hyphenated lowercase UUID string on every external surface.
pub type AccountId = Uuid;

/// Number of fraction digits kept for every balance
pub const BALANCE_SCALE: u32 = 2;

/// Largest balance magnitude an account can hold (99999999.99)
///
/// Ten significant digits with two of them after the point.
/// Mantissa parts: 9_999_999_999 = 2 * 2^32 + 1_410_065_407.
pub const MAX_BALANCE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, BALANCE_SCALE);

/// A named account holding a fixed-point balance
///
/// `version` is bumped by the store on every write and is used for
/// optimistic concurrency; it never leaves the process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    /// Unique identifier, supplied by the upload or generated
    pub id: AccountId,

    /// Display name (not unique)
    pub name: String,

    /// Current balance with two fraction digits
    #[serde(serialize_with = "serialize_balance")]
    pub balance: Decimal,

    /// Store-managed write counter
    #[serde(skip)]
    pub version: u64,
}

impl Account {
    /// Create a new account that has never been written to a store
    pub fn new(id: AccountId, name: impl Into<String>, balance: Decimal) -> Self {
        Account {
            id,
            name: name.into(),
            balance,
            version: 0,
        }
    }

    /// Balance formatted with exactly two fraction digits
    pub fn formatted_balance(&self) -> String {
        format_balance(self.balance)
    }
}

/// Parse a plain fixed-point decimal such as `-12.50`
///
/// `Decimal::from_str` also accepts `_` digit separators; those are rejected.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    if raw.contains('_') {
        return None;
    }
    Decimal::from_str(raw).ok()
}

/// Format a balance with exactly two fraction digits
pub fn format_balance(balance: Decimal) -> String {
    format!("{:.2}", balance)
}

fn serialize_balance<S>(balance: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_balance(*balance))
}
