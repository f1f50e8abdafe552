//! Billings Domain Layer
//!
//! Core data model for turning phone notifications into bookkeeping entries,
//! plus the trait interfaces every other layer depends upon.
//!
//! ## Key Concepts
//!
//! - **Notification**: one raw app alert, parsed from a batch line
//! - **ExtractionResult**: what the model pulled out of a notification
//! - **Transaction**: an accepted expense or income, appended to the store
//! - **StoredRecord**: a stored line read back as a generic JSON object
//!
//! ## Architecture
//!
//! - Pure data types and trait definitions only
//! - Infrastructure implementations live in other crates
//! - Dependencies limited to serialization, time and decimal primitives

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod extraction;
pub mod notification;
pub mod record;
pub mod traits;
pub mod transaction;
pub mod transaction_type;

// Re-exports for convenience
pub use extraction::{ExtractionResult, DEFAULT_CATEGORY, DEFAULT_SHOP};
pub use notification::Notification;
pub use record::{StoredRecord, TransactionRecord, RECORD_SCHEMA_VERSION};
pub use transaction::Transaction;
pub use transaction_type::TransactionType;
