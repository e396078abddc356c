pub mod transaction;

pub use transaction::{Transaction, TIMESTAMP_FORMAT, current_timestamp, parse_amount};
