pub mod ledger;

pub use ledger::{Ledger, Summary};
