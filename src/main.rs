use std::env;
use std::process;

use finance_ledger::{Settings, run};
use log::info;

fn main() {
    // Collect command-line arguments - at most one, the ledger CSV file path
    let args: Vec<String> = env::args().collect();
    let Some(settings) = Settings::from_env(&args[1..]) else {
        eprintln!("Usage: {} [ledger.csv]", args[0]);
        process::exit(1);
    };
    // Initialize logger (respect RUST_LOG env var if set)
    env_logger::init();

    info!("starting finance ledger with file: {}", settings.ledger_path.display());

    if let Err(e) = run(&settings) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
