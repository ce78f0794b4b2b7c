//! Error types for the account ledger
//!
//! This module defines every error the ingestion pipeline, the account store
//! and the transfer engine can produce. Messages are written to be shown to
//! end users as-is.
//!
//! # Error Categories
//!
//! - **Ingestion Errors**: unsupported upload type, malformed file content
//! - **Persistence Errors**: rows that cannot become accounts, store failures
//! - **Transfer Errors**: one variant per validation step plus commit failure
//! - **Application Errors**: file access and output failures in the CLI

use super::account::AccountId;
use super::upload::REQUIRED_HEADERS;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while validating and parsing an uploaded file
///
/// Both variants are reported back to the uploader; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestionError {
    /// The declared content type is not on the allow-list
    #[error(
        "Unsupported file type '{content_type}'. Allowed types: {}",
        allowed.join(", ")
    )]
    UnsupportedFileType {
        /// The content type the upload declared
        content_type: String,
        /// Content types currently accepted
        allowed: Vec<String>,
    },

    /// The file is empty, not UTF-8, or its header is wrong
    ///
    /// The display text is the user-facing expected-structure message; the
    /// `reason` carries the diagnostic detail for logs.
    #[error(
        "File is not valid: it may be empty or not in the correct structure. Expected structure: {}",
        REQUIRED_HEADERS.join(", ")
    )]
    MalformedContent {
        /// What exactly was wrong
        reason: String,
    },
}

/// Errors raised by an account store implementation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The backing store could not be reached or refused the operation
    #[error("Account store unavailable: {message}")]
    Unavailable { message: String },

    /// A row lock was poisoned by a writer that panicked
    #[error("Account {id} is unavailable after a failed write")]
    Poisoned { id: AccountId },

    /// An update targeted an account that does not exist
    #[error("Account {id} does not exist")]
    NotFound { id: AccountId },

    /// A paired commit was asked to write the same row twice
    #[error("Cannot commit account {id} against itself")]
    SameRow { id: AccountId },
}

/// Errors raised while turning parsed records into stored accounts
///
/// Any of these aborts the whole batch; no record of the batch is stored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PersistenceError {
    /// A data row could not be converted into an account
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord {
        /// Data row in the source file, counting blank lines (the header is row 0)
        row: usize,
        /// Description of the problem
        message: String,
    },

    /// The store rejected the bulk insert
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from the complete upload pipeline (parse then persist)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UploadError {
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Errors raised by the transfer engine
///
/// Variants are listed in validation order; the first failing check wins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransferError {
    /// One of source, destination or amount is absent or blank
    #[error("Missing required parameters")]
    MissingParameters,

    /// An id does not parse or does not resolve to an account
    #[error("Account not found")]
    AccountNotFound {
        /// The id as supplied by the caller
        id: String,
    },

    /// The amount is not a non-negative decimal with at most two fraction digits
    #[error("Invalid amount '{amount}'")]
    InvalidAmount { amount: String },

    /// Source and destination are the same account
    #[error("Cannot transfer to the same account")]
    SelfTransfer,

    /// The source balance does not cover the amount
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        available: Decimal,
        requested: Decimal,
    },

    /// The validated transfer could not be committed
    #[error("Transfer failed: {reason}")]
    TransferFailed { reason: String },
}

/// Errors surfaced by the command-line application
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError { message: String },

    /// Writing CSV output failed
    #[error("CSV output error: {message}")]
    Output { message: String },

    /// The upload pipeline rejected the input
    #[error(transparent)]
    Upload(#[from] UploadError),
}

// Conversion from io::Error to AppError
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        AppError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to AppError
impl From<csv::Error> for AppError {
    fn from(error: csv::Error) -> Self {
        AppError::Output {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl IngestionError {
    /// Create an UnsupportedFileType error
    pub fn unsupported_file_type(content_type: &str, allowed: &[&str]) -> Self {
        IngestionError::UnsupportedFileType {
            content_type: content_type.to_string(),
            allowed: allowed.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Create a MalformedContent error
    pub fn malformed(reason: impl Into<String>) -> Self {
        IngestionError::MalformedContent {
            reason: reason.into(),
        }
    }
}

impl PersistenceError {
    /// Create an InvalidRecord error
    pub fn invalid_record(row: usize, message: impl Into<String>) -> Self {
        PersistenceError::InvalidRecord {
            row,
            message: message.into(),
        }
    }
}

impl TransferError {
    /// Create an AccountNotFound error
    pub fn account_not_found(id: &str) -> Self {
        TransferError::AccountNotFound { id: id.to_string() }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str) -> Self {
        TransferError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(available: Decimal, requested: Decimal) -> Self {
        TransferError::InsufficientBalance {
            available,
            requested,
        }
    }

    /// Create a TransferFailed error
    pub fn failed(reason: impl Into<String>) -> Self {
        TransferError::TransferFailed {
            reason: reason.into(),
        }
    }

    /// HTTP-equivalent status code for this error kind
    pub fn status_code(&self) -> u16 {
        match self {
            TransferError::MissingParameters
            | TransferError::InvalidAmount { .. }
            | TransferError::SelfTransfer
            | TransferError::InsufficientBalance { .. } => 400,
            TransferError::AccountNotFound { .. } => 404,
            TransferError::TransferFailed { .. } => 500,
        }
    }
}
