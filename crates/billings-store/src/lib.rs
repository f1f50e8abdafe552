//! Billings Storage Layer
//!
//! Implements the TransactionStore trait as an append-only JSON Lines file.
//!
//! # Layout
//!
//! - One UTF-8 file, no header
//! - One serialized transaction per line, each line independently parseable
//! - Lines are only ever appended; nothing is rewritten
//!
//! # Examples
//!
//! ```no_run
//! use billings_store::JsonlStore;
//! use billings_domain::traits::TransactionStore;
//!
//! let store = JsonlStore::new("transactions.jsonl");
//! let newest_first = store.list_all().unwrap();
//! ```

#![warn(missing_docs)]

use billings_domain::traits::TransactionStore;
use billings_domain::{StoredRecord, Transaction, TransactionRecord};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};

/// Default store file name
pub const DEFAULT_STORE_FILE: &str = "transactions.jsonl";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transaction could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// JSON Lines implementation of TransactionStore
///
/// # Thread Safety
///
/// Appends and reads on one `JsonlStore` are serialized by an internal lock,
/// and each record is written with a single `write_all` in append mode, so
/// concurrent batches never interleave partial lines. Share one instance
/// (e.g. behind an `Arc`) per file.
#[derive(Debug)]
pub struct JsonlStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlStore {
    /// Create a store backed by the file at `path`
    ///
    /// The file (and its parent directories) are created on the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize a transaction to one line, terminator included
    fn to_line(transaction: &Transaction) -> Result<String, StoreError> {
        // serde_json never emits raw line breaks inside a compact value and
        // leaves non-ASCII text unescaped.
        let mut line = serde_json::to_string(&TransactionRecord::new(transaction))?;
        line.push('\n');
        Ok(line)
    }

    /// Whether the file ends partway through a line (e.g. after a torn write)
    fn ends_mid_line(file: &mut File) -> Result<bool, StoreError> {
        if file.metadata()?.len() == 0 {
            return Ok(false);
        }
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }

    fn parse_line(number: usize, bytes: &[u8]) -> Option<StoredRecord> {
        let line = match std::str::from_utf8(bytes) {
            Ok(line) => line.trim(),
            Err(e) => {
                debug!(line = number, "Skipping store line with invalid UTF-8: {}", e);
                return None;
            }
        };

        if line.is_empty() {
            return None;
        }

        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(record)) => Some(record),
            Ok(_) => {
                debug!(line = number, "Skipping store line that is not a JSON object");
                None
            }
            Err(e) => {
                debug!(line = number, "Skipping unparsable store line: {}", e);
                None
            }
        }
    }
}

impl TransactionStore for JsonlStore {
    type Error = StoreError;

    fn append(&self, transaction: &Transaction) -> Result<(), Self::Error> {
        let mut line = Self::to_line(transaction)?;

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        // Start a fresh line so a torn tail never swallows this record
        if Self::ends_mid_line(&mut file)? {
            debug!(path = %self.path.display(), "Store ends mid-line, terminating it");
            line.insert(0, '\n');
        }

        file.write_all(line.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    fn list_all(&self) -> Result<Vec<StoredRecord>, Self::Error> {
        let contents = {
            let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
            match std::fs::read(&self.path) {
                Ok(contents) => contents,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(e.into()),
            }
        };

        let mut skipped = 0usize;
        let mut records = Vec::new();
        for (idx, bytes) in contents.split(|b| *b == b'\n').enumerate() {
            match Self::parse_line(idx + 1, bytes) {
                Some(record) => records.push(record),
                None if bytes.iter().all(u8::is_ascii_whitespace) => {}
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(
                skipped,
                path = %self.path.display(),
                "Skipped corrupted store lines"
            );
        }

        records.reverse();
        Ok(records)
    }
}
