//! Transfer request and outcome types

use super::account::Account;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Raw transfer parameters as received from a caller
///
/// Every field is optional and unparsed; the transfer engine owns all
/// validation. Field names match the query/form parameters of the transfer
/// endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransferRequest {
    /// Source account id
    #[serde(rename = "transfer_from")]
    pub from_id: Option<String>,

    /// Destination account id
    #[serde(rename = "transfer_to")]
    pub to_id: Option<String>,

    /// Amount to move, as a decimal string
    #[serde(rename = "transfer_balance")]
    pub amount: Option<String>,
}

impl TransferRequest {
    /// Build a request with all three parameters present
    pub fn new(
        from_id: impl Into<String>,
        to_id: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        TransferRequest {
            from_id: Some(from_id.into()),
            to_id: Some(to_id.into()),
            amount: Some(amount.into()),
        }
    }
}

/// Both accounts as committed by a successful transfer
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOutcome {
    pub from: Account,
    pub to: Account,
}

impl TransferOutcome {
    pub fn new_from_balance(&self) -> Decimal {
        self.from.balance
    }

    pub fn new_to_balance(&self) -> Decimal {
        self.to.balance
    }
}
