pub mod settings;

pub use settings::{DEFAULT_LEDGER_FILE, LEDGER_FILE_ENV, Settings};
