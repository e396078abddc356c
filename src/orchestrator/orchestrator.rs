use std::error::Error;
use std::io::{self, BufRead, Write};

use log::{error, info, warn};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::Settings;
use crate::errors::LedgerError;
use crate::ledger::{Ledger, Summary};
use crate::transactions::parse_amount;

/// Open the configured ledger and drive the interactive menu on stdin/stdout.
pub fn run(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let mut ledger = Ledger::open(&settings.ledger_path)?;
    info!("ledger ready at {}", ledger.path().display());

    let stdin = io::stdin();
    let mut shell = Shell::new(&mut ledger, stdin.lock(), io::stdout());
    shell.run()?;

    Ok(())
}

/// Two decimal places with a euro sign, e.g. `€12.50`.
pub fn format_euro(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("€{:.2}", rounded)
}

/// Fixed-width history table followed by the balance line.
pub fn render_summary<W: Write>(out: &mut W, summary: &Summary<'_>) -> io::Result<()> {
    writeln!(out, "{:<20} {:<30} {:>10}", "Date", "Category", "Amount")?;
    writeln!(out, "{}", "-".repeat(65))?;
    for tx in summary.transactions {
        writeln!(
            out,
            "{:<20} {:<30} {:>10}",
            tx.timestamp,
            tx.category,
            format_euro(tx.amount)
        )?;
    }
    writeln!(out, "Current balance: {}", format_euro(summary.balance))
}

/// Menu loop over any line-based input and writable output. Ledger
/// failures are reported to the user and the loop carries on; only a
/// failure to talk to the user ends it.
pub struct Shell<'a, R, W> {
    ledger: &'a mut Ledger,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(ledger: &'a mut Ledger, input: R, output: W) -> Self {
        Self {
            ledger,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "Welcome to Personal Finance Manager!")?;

        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("Choose an option (1-6): ")? else {
                break;
            };

            match choice.as_str() {
                "1" => self.add_funds()?,
                "2" => self.record_expense()?,
                "3" => self.show_balance()?,
                "4" => self.show_summary()?,
                "5" => self.clear_all()?,
                "6" => break,
                _ => writeln!(self.output, "Invalid option. Please try again.")?,
            }
        }

        writeln!(self.output, "Exiting... Thank you for using the app!")
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nMenu:")?;
        writeln!(self.output, "1. Add Funds")?;
        writeln!(self.output, "2. Record Expense")?;
        writeln!(self.output, "3. Check Balance")?;
        writeln!(self.output, "4. View Transaction History")?;
        writeln!(self.output, "5. Clear All Previous Entries")?;
        writeln!(self.output, "6. Exit")
    }

    /// `None` once input is exhausted.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Funds and expenses are both entered as positive amounts.
    fn prompt_amount(&mut self, message: &str) -> io::Result<Option<Decimal>> {
        let Some(text) = self.prompt(message)? else {
            return Ok(None);
        };

        match parse_amount(&text) {
            Ok(amount) if amount > Decimal::ZERO => Ok(Some(amount)),
            Ok(amount) => {
                warn!("rejected non-positive amount {}", amount);
                writeln!(self.output, "Amount must be greater than zero.")?;
                Ok(None)
            }
            Err(err) => {
                self.report(err)?;
                Ok(None)
            }
        }
    }

    fn prompt_label(&mut self, message: &str, field: &str) -> io::Result<Option<String>> {
        let Some(label) = self.prompt(message)? else {
            return Ok(None);
        };

        if label.is_empty() {
            warn!("rejected empty {}", field.to_lowercase());
            writeln!(self.output, "{} cannot be empty.", field)?;
            return Ok(None);
        }
        Ok(Some(label))
    }

    fn add_funds(&mut self) -> io::Result<()> {
        let Some(amount) = self.prompt_amount("Enter the amount of funds: €")? else {
            return Ok(());
        };
        let Some(source) =
            self.prompt_label("Enter source of funds (Salary, Saving, Gift): ", "Source of funds")?
        else {
            return Ok(());
        };

        match self.ledger.add_funds(amount, &source, None).map(|tx| tx.amount) {
            Ok(added) => writeln!(self.output, "Funds added: {}", format_euro(added)),
            Err(err) => self.report(err),
        }
    }

    fn record_expense(&mut self) -> io::Result<()> {
        let Some(amount) = self.prompt_amount("Enter the amount of expense: €")? else {
            return Ok(());
        };

        // Checked again by the ledger; asking here spares the user the
        // category prompt.
        let available = self.ledger.balance();
        if amount > available {
            return self.report(LedgerError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        let Some(category) = self.prompt_label(
            "Enter expense category (Rent, Groceries, Transport, Utility, Miscellaneous): ",
            "Expense category",
        )?
        else {
            return Ok(());
        };

        match self.ledger.add_expenses(amount, &category, None).map(|tx| tx.category.clone()) {
            Ok(category) => writeln!(
                self.output,
                "Expense recorded: {} for {}",
                format_euro(amount),
                category
            ),
            Err(err) => self.report(err),
        }
    }

    fn show_balance(&mut self) -> io::Result<()> {
        writeln!(self.output, "Current balance: {}", format_euro(self.ledger.balance()))
    }

    fn show_summary(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nSummary:")?;
        render_summary(&mut self.output, &self.ledger.summary())
    }

    fn clear_all(&mut self) -> io::Result<()> {
        match self.ledger.reset() {
            Ok(()) => writeln!(self.output, "All transactions cleared (file kept)."),
            Err(err) => self.report(err),
        }
    }

    fn report(&mut self, err: LedgerError) -> io::Result<()> {
        match err {
            LedgerError::InvalidAmount(_) => {
                warn!("{}", err);
                writeln!(self.output, "Invalid amount. Please enter a number.")
            }
            LedgerError::InsufficientBalance { .. } => {
                warn!("{}", err);
                writeln!(self.output, "Insufficient balance. Please try again")
            }
            LedgerError::Overflow { .. } => {
                warn!("{}", err);
                writeln!(self.output, "Amount too large for the current balance.")
            }
            other => {
                error!("{}", other);
                writeln!(self.output, "Error: {}", other)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::Transaction;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn decimal(amount: i64) -> Decimal {
        Decimal::from(amount)
    }

    fn fresh_ledger() -> (TempDir, Ledger) {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::open(dir.path().join("ledger.csv")).unwrap();
        (dir, ledger)
    }

    fn drive(ledger: &mut Ledger, input: &str) -> String {
        let mut shell = Shell::new(ledger, Cursor::new(input.to_string()), Vec::new());
        shell.run().unwrap();
        String::from_utf8(shell.into_output()).unwrap()
    }

    #[test]
    fn test_format_euro() {
        assert_eq!(format_euro(decimal(150)), "€150.00");
        assert_eq!(format_euro(Decimal::new(-5, 0)), "€-5.00");
        assert_eq!(format_euro(Decimal::new(12345, 3)), "€12.35");
    }

    #[test]
    fn test_add_funds_and_check_balance() {
        let (_dir, mut ledger) = fresh_ledger();
        let out = drive(&mut ledger, "1\n150\nSalary\n3\n6\n");

        assert!(out.starts_with("Welcome to Personal Finance Manager!"));
        assert!(out.contains("Funds added: €150.00"));
        assert!(out.contains("Current balance: €150.00"));
        assert!(out.trim_end().ends_with("Exiting... Thank you for using the app!"));
        assert_eq!(ledger.balance(), decimal(150));
    }

    #[test]
    fn test_record_expense() {
        let (_dir, mut ledger) = fresh_ledger();
        let out = drive(&mut ledger, "1\n200\nGift\n2\n50\nGroceries\n6\n");

        assert!(out.contains("Expense recorded: €50.00 for Groceries"));
        assert_eq!(ledger.balance(), decimal(150));
        assert_eq!(ledger.history()[1].amount, decimal(-50));
    }

    #[test]
    fn test_insufficient_balance_skips_category_prompt() {
        let (_dir, mut ledger) = fresh_ledger();
        let out = drive(&mut ledger, "2\n10\n6\n");

        assert!(out.contains("Insufficient balance. Please try again"));
        assert!(!out.contains("Enter expense category"));
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn test_rejects_bad_input() {
        let (_dir, mut ledger) = fresh_ledger();
        let out = drive(&mut ledger, "1\nabc\n1\n-5\n1\n20\n\n9\n6\n");

        assert!(out.contains("Invalid amount. Please enter a number."));
        assert!(out.contains("Amount must be greater than zero."));
        assert!(out.contains("Source of funds cannot be empty."));
        assert!(out.contains("Invalid option. Please try again."));
        assert_eq!(ledger.balance(), Decimal::ZERO);
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn test_summary_table() {
        let (_dir, mut ledger) = fresh_ledger();
        ledger.add_funds(decimal(300), "Salary", Some("2025-05-29 10:00")).unwrap();
        ledger.add_expenses(decimal(50), "Groceries", Some("2025-05-30 15:00")).unwrap();

        let out = drive(&mut ledger, "4\n6\n");

        assert!(out.contains(&format!("{:<20} {:<30} {:>10}", "Date", "Category", "Amount")));
        assert!(out.contains(&"-".repeat(65)));
        assert!(out.contains(&format!("{:<20} {:<30} {:>10}", "2025-05-29 10:00", "Salary", "€300.00")));
        assert!(out.contains(&format!("{:<20} {:<30} {:>10}", "2025-05-30 15:00", "Groceries", "€-50.00")));
        assert!(out.contains("Current balance: €250.00"));
    }

    #[test]
    fn test_render_summary_empty() {
        let (_dir, ledger) = fresh_ledger();
        let mut out = Vec::new();
        render_summary(&mut out, &ledger.summary()).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.ends_with("Current balance: €0.00\n"));
    }

    #[test]
    fn test_clear_all() {
        let (_dir, mut ledger) = fresh_ledger();
        ledger.add_funds(decimal(100), "Salary", None).unwrap();

        let out = drive(&mut ledger, "5\n3\n6\n");

        assert!(out.contains("All transactions cleared (file kept)."));
        assert!(out.contains("Current balance: €0.00"));
        assert_eq!(fs::read_to_string(ledger.path()).unwrap(), "Date,Category,Amount\n");
    }

    #[test]
    fn test_overflowing_funds_are_rejected() {
        let (_dir, mut ledger) = fresh_ledger();
        let max = Decimal::MAX.to_string();
        let out = drive(&mut ledger, &format!("1\n{max}\nSalary\n1\n{max}\nBonus\n6\n"));

        assert!(out.contains("Amount too large for the current balance."));
        assert_eq!(ledger.balance(), Decimal::MAX);
        assert_eq!(ledger.history().len(), 1);
    }

    #[test]
    fn test_end_of_input_exits() {
        let (_dir, mut ledger) = fresh_ledger();
        let out = drive(&mut ledger, "1\n25\n");

        assert!(out.trim_end().ends_with("Exiting... Thank you for using the app!"));
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn test_io_failure_is_reported_and_loop_continues() {
        let (_dir, mut ledger) = fresh_ledger();
        fs::remove_file(ledger.path()).unwrap();

        let out = drive(&mut ledger, "1\n10\nGift\n3\n6\n");

        assert!(out.contains("Error: cannot access ledger file"));
        assert!(out.contains("Current balance: €0.00"));
        assert_eq!(ledger.history(), &[] as &[Transaction]);
    }
}
