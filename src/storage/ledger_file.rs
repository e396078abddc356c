use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Terminator, Writer, WriterBuilder};
use log::{debug, info, warn};

use crate::errors::LedgerError;
use crate::transactions::Transaction;

pub const HEADER: [&str; 3] = ["Date", "Category", "Amount"];

/// Durable storage for a ledger: a CSV file with a fixed header row followed
/// by one row per transaction. Every call opens the file, does one read,
/// append or rewrite, and closes it again.
#[derive(Debug, Clone)]
pub struct LedgerFile {
    path: PathBuf,
}

impl LedgerFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored transaction, creating a header-only file if there
    /// is nothing at `path` yet.
    pub fn open_or_create(path: impl Into<PathBuf>) -> Result<(Self, Vec<Transaction>), LedgerError> {
        let storage = Self::new(path);
        let transactions = storage.load()?;
        Ok((storage, transactions))
    }

    /// Parse all rows in file order. Rows that cannot be parsed are logged
    /// and skipped.
    pub fn load(&self) -> Result<Vec<Transaction>, LedgerError> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("ledger file {} not found, creating it", self.path.display());
                self.reset()?;
                return Ok(Vec::new());
            }
            Err(err) => return Err(LedgerError::io(self.path.clone(), err)),
        };

        let metadata = file
            .metadata()
            .map_err(|err| LedgerError::io(self.path.clone(), err))?;
        if metadata.len() == 0 {
            // An empty file has lost its header; appending to it as-is would
            // turn the first transaction into the header on the next load.
            info!("ledger file {} is empty, writing header", self.path.display());
            drop(file);
            self.reset()?;
            return Ok(Vec::new());
        }
        self.ensure_trailing_newline(&mut file, metadata.len())?;

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut transactions = Vec::new();
        for result in rdr.records() {
            let record = result?;
            match Transaction::from_record(&record) {
                Ok(tx) => transactions.push(tx),
                Err(err) => warn!("{}: skipping {}", self.path.display(), err),
            }
        }

        Ok(transactions)
    }

    /// Append one row. The file must already exist.
    pub fn append(&self, tx: &Transaction) -> Result<(), LedgerError> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|err| LedgerError::io(self.path.clone(), err))?;

        let mut wtr = Self::writer(file);
        wtr.serialize(tx)?;
        wtr.flush()
            .map_err(|err| LedgerError::io(self.path.clone(), err))?;

        debug!("appended {:?} to {}", tx, self.path.display());
        Ok(())
    }

    /// Truncate the file back to the header row, creating it if needed.
    pub fn reset(&self) -> Result<(), LedgerError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|err| LedgerError::io(self.path.clone(), err))?;

        let mut wtr = Self::writer(file);
        wtr.write_record(HEADER)?;
        wtr.flush()
            .map_err(|err| LedgerError::io(self.path.clone(), err))?;

        Ok(())
    }

    /// Terminate a hand-edited last row so the next append starts a new one.
    fn ensure_trailing_newline(&self, file: &mut File, len: u64) -> Result<(), LedgerError> {
        let io_err = |err: std::io::Error| LedgerError::io(self.path.clone(), err);

        let mut last = [0u8; 1];
        file.seek(SeekFrom::Start(len - 1)).map_err(io_err)?;
        file.read_exact(&mut last).map_err(io_err)?;
        file.rewind().map_err(io_err)?;

        if last[0] != b'\n' {
            warn!("{}: last row has no line terminator, adding one", self.path.display());
            OpenOptions::new()
                .append(true)
                .open(&self.path)
                .and_then(|mut f| f.write_all(b"\n"))
                .map_err(io_err)?;
        }
        Ok(())
    }

    fn writer<W: Write>(inner: W) -> Writer<W> {
        WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(inner)
    }
}
