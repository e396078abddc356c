use std::path::PathBuf;

pub const DEFAULT_LEDGER_FILE: &str = "appData.csv";
pub const LEDGER_FILE_ENV: &str = "FINANCE_LEDGER_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub ledger_path: PathBuf,
}

impl Settings {
    /// Resolve settings from positional arguments (program name excluded)
    /// and the value of `FINANCE_LEDGER_FILE`. Returns `None` when more than
    /// one argument is given.
    pub fn resolve(args: &[String], env_path: Option<String>) -> Option<Self> {
        let ledger_path = match args {
            [] => env_path
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LEDGER_FILE.to_string()),
            [path] => path.clone(),
            _ => return None,
        };

        Some(Self {
            ledger_path: PathBuf::from(ledger_path),
        })
    }

    pub fn from_env(args: &[String]) -> Option<Self> {
        Self::resolve(args, std::env::var(LEDGER_FILE_ENV).ok())
    }
}
