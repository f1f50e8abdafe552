//! Stored record schema
//!
//! The write path serializes a [`Transaction`] wrapped in a
//! [`TransactionRecord`], which stamps the line with `schemaVersion`. The read
//! path hands each line back as a generic [`StoredRecord`] so readers are not
//! coupled to the writer's struct; typed readers go through
//! [`Transaction::from_record`].
//!
//! Version 1 keys: `schemaVersion`, `date` (RFC 3339), `app`, `shop`,
//! `rawText`, `amount` (number), `category`, `type` (`expense` | `income`).
//! Lines written before versioning carry no `schemaVersion` and are read as
//! version 1.

use crate::Transaction;
use serde::Serialize;
use serde_json::Value;

/// A stored line, as a generic JSON object
pub type StoredRecord = serde_json::Map<String, Value>;

/// Schema version written with every new record
pub const RECORD_SCHEMA_VERSION: u64 = 1;

/// Key holding the schema version in a stored record
pub const SCHEMA_VERSION_KEY: &str = "schemaVersion";

/// Versioned envelope used when writing a transaction
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord<'a> {
    /// Always [`RECORD_SCHEMA_VERSION`] for new writes
    pub schema_version: u64,

    /// The transaction fields, flattened next to the version
    #[serde(flatten)]
    pub transaction: &'a Transaction,
}

impl<'a> TransactionRecord<'a> {
    /// Wrap a transaction at the current schema version
    pub fn new(transaction: &'a Transaction) -> Self {
        Self {
            schema_version: RECORD_SCHEMA_VERSION,
            transaction,
        }
    }
}

/// Schema version of a stored record (missing means version 1)
pub fn schema_version(record: &StoredRecord) -> Option<u64> {
    match record.get(SCHEMA_VERSION_KEY) {
        None => Some(1),
        Some(value) => value.as_u64(),
    }
}

impl Transaction {
    /// Read a transaction back from a stored record
    ///
    /// Returns `None` for records from a newer schema, records missing
    /// required fields, and records whose type is not financial.
    pub fn from_record(record: &StoredRecord) -> Option<Self> {
        let version = schema_version(record)?;
        if version > RECORD_SCHEMA_VERSION {
            return None;
        }

        serde_json::from_value::<Transaction>(Value::Object(record.clone()))
            .ok()
            .filter(|tx| tx.kind.is_financial())
    }
}
