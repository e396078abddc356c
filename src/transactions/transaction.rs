use std::str::FromStr;

use chrono::Local;
use csv::StringRecord;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::LedgerError;

/// Minute precision, e.g. `2025-05-29 10:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One recorded movement of funds. Positive amounts are funds received,
/// negative amounts are expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    #[serde(rename = "Date")]
    pub timestamp: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Amount")]
    pub amount: Decimal,
}

impl Transaction {
    pub fn new(timestamp: impl Into<String>, category: impl Into<String>, amount: Decimal) -> Self {
        Self {
            timestamp: timestamp.into(),
            category: category.into(),
            amount,
        }
    }

    /// Build a transaction from a stored row. Fields past the third are ignored.
    pub fn from_record(record: &StringRecord) -> Result<Self, LedgerError> {
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() < 3 {
            return Err(LedgerError::MalformedRow {
                line,
                reason: format!("expected 3 fields, found {}", record.len()),
            });
        }

        let amount = parse_amount(&record[2]).map_err(|_| LedgerError::MalformedRow {
            line,
            reason: format!("amount {:?} is not a number", &record[2]),
        })?;

        Ok(Self::new(&record[0], &record[1], amount))
    }
}

/// Parse user supplied text into an exact decimal amount.
pub fn parse_amount(text: &str) -> Result<Decimal, LedgerError> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| LedgerError::InvalidAmount(text.to_string()))
}

pub fn current_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
