pub mod ledger_file;

pub use ledger_file::{HEADER, LedgerFile};
