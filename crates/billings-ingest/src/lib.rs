//! Billings Ingest
//!
//! The ingestion pipeline: raw notification batches in, stored transactions
//! out.
//!
//! # Architecture
//!
//! ```text
//! Batch → split lines → Notification → Extractor → accept/reject → TransactionStore
//! ```
//!
//! # Failure containment
//!
//! | Line problem | Outcome | Effect |
//! |---|---|---|
//! | Not a valid notification | `Malformed` | skipped, logged |
//! | Extraction call failed | `ExtractionFailed` | dropped, logged |
//! | Classified as `none` | `Rejected` | nothing written |
//! | Append failed | `StoreFailed` | logged at error |
//!
//! None of these abort the batch or reach the caller as an error.
//!
//! # Example
//!
//! ```no_run
//! use billings_extractor::{Extractor, ExtractorConfig};
//! use billings_ingest::Pipeline;
//! use billings_llm::MockProvider;
//! use billings_store::JsonlStore;
//!
//! # async fn example() {
//! let extractor = Extractor::new(MockProvider::default(), ExtractorConfig::default());
//! let pipeline = Pipeline::new(extractor, JsonlStore::new("transactions.jsonl"));
//!
//! let report = pipeline
//!     .ingest(r#"{"appName":"Bank","title":"Payment","text":"You paid $42.50"}"#)
//!     .await;
//! println!("{}", report.summary());
//! # }
//! ```

#![warn(missing_docs)]

mod batch;
mod pipeline;
mod report;

pub use batch::split_batch;
pub use pipeline::Pipeline;
pub use report::{IngestReport, LineOutcome};
