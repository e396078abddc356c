use std::path::{Path, PathBuf};

use log::{info, warn};
use rust_decimal::Decimal;

use crate::errors::LedgerError;
use crate::storage::LedgerFile;
use crate::transactions::{Transaction, current_timestamp};

/// Running balance and transaction history, kept in step with the ledger
/// file. The file is written first; memory only changes once it succeeds.
#[derive(Debug)]
pub struct Ledger {
    storage: LedgerFile,
    balance: Decimal,
    history: Vec<Transaction>,
}

/// Read-only view of the full history and the balance it sums to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary<'a> {
    pub transactions: &'a [Transaction],
    pub balance: Decimal,
}

impl Ledger {
    /// Load the ledger stored at `path`, creating an empty one if absent.
    /// Rows that would push the balance out of range are skipped.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let (storage, rows) = LedgerFile::open_or_create(path)?;

        let mut balance = Decimal::ZERO;
        let mut history = Vec::with_capacity(rows.len());
        for tx in rows {
            match balance.checked_add(tx.amount) {
                Some(next) => {
                    balance = next;
                    history.push(tx);
                }
                None => warn!(
                    "{}: skipping {:?}, {}",
                    storage.path().display(),
                    tx,
                    LedgerError::Overflow {
                        amount: tx.amount,
                        balance
                    }
                ),
            }
        }

        info!(
            "loaded {} transactions from {}, balance {}",
            history.len(),
            storage.path().display(),
            balance
        );

        Ok(Self {
            storage,
            balance,
            history,
        })
    }

    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    /// Record funds received. The amount is stored exactly as given.
    pub fn add_funds(
        &mut self,
        amount: Decimal,
        source: &str,
        timestamp: Option<&str>,
    ) -> Result<&Transaction, LedgerError> {
        self.record(amount, source, timestamp)
    }

    /// Record an expense, stored as a negative amount. Rejected without any
    /// write when it exceeds the current balance.
    pub fn add_expenses(
        &mut self,
        amount: Decimal,
        category: &str,
        timestamp: Option<&str>,
    ) -> Result<&Transaction, LedgerError> {
        if amount > self.balance {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available: self.balance,
            });
        }
        self.record(-amount, category, timestamp)
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    pub fn summary(&self) -> Summary<'_> {
        Summary {
            transactions: &self.history,
            balance: self.balance,
        }
    }

    /// Drop every transaction, on disk first and then in memory.
    pub fn reset(&mut self) -> Result<(), LedgerError> {
        self.storage.reset()?;
        self.history.clear();
        self.balance = Decimal::ZERO;

        info!("cleared all transactions in {}", self.storage.path().display());
        Ok(())
    }

    fn record(
        &mut self,
        amount: Decimal,
        category: &str,
        timestamp: Option<&str>,
    ) -> Result<&Transaction, LedgerError> {
        let timestamp = timestamp.map_or_else(current_timestamp, str::to_string);
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow {
                amount,
                balance: self.balance,
            })?;
        let tx = Transaction::new(timestamp, category, amount);

        self.storage.append(&tx)?;

        self.balance = balance;
        self.history.push(tx);
        Ok(&self.history[self.history.len() - 1])
    }
}
