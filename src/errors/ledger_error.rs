use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

/// Everything that can go wrong while loading or mutating a ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A stored row that could not be turned into a transaction.
    /// Skipped during load, never returned from a public operation.
    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("invalid amount: {0:?} is not a number")]
    InvalidAmount(String),

    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Decimal,
        available: Decimal,
    },

    #[error("amount {amount} would overflow the balance {balance}")]
    Overflow { amount: Decimal, balance: Decimal },

    #[error("cannot access ledger file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LedgerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LedgerError::Io {
            path: path.into(),
            source,
        }
    }
}
