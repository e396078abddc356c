pub mod config;
pub mod errors;
pub mod ledger;
pub mod orchestrator;
pub mod storage;
pub mod transactions;

pub use config::Settings;
pub use errors::LedgerError;
pub use ledger::{Ledger, Summary};
pub use orchestrator::run;
pub use storage::LedgerFile;
pub use transactions::{Transaction, parse_amount};
