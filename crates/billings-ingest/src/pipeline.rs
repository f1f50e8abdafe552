//! The notification-to-transaction pipeline

use crate::batch::split_batch;
use crate::report::{IngestReport, LineOutcome};
use billings_domain::traits::{CompletionProvider, TransactionStore};
use billings_domain::{Notification, StoredRecord, Transaction, TransactionType};
use billings_extractor::Extractor;
use chrono::Utc;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Splits batches, extracts each notification and appends accepted transactions
///
/// Lines are processed one at a time, in batch order, so at most one
/// extraction call per batch is in flight and appends from one batch keep
/// their order. Extraction failures are not retried.
///
/// Store appends are blocking file I/O and run on tokio's blocking pool.
pub struct Pipeline<L, S>
where
    L: CompletionProvider,
{
    extractor: Extractor<L>,
    store: Arc<S>,
}

impl<L, S> Pipeline<L, S>
where
    L: CompletionProvider + Send + Sync,
    L::Error: Display,
    S: TransactionStore + Send + Sync + 'static,
    S::Error: Display + Send + 'static,
{
    /// Create a new pipeline
    pub fn new(extractor: Extractor<L>, store: S) -> Self {
        Self {
            extractor,
            store: Arc::new(store),
        }
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The extractor
    pub fn extractor(&self) -> &Extractor<L> {
        &self.extractor
    }

    /// Ingest a raw batch of line-delimited notifications
    ///
    /// Never fails: every line ends in a [`LineOutcome`] and one bad line
    /// never stops the lines after it.
    pub async fn ingest(&self, raw_batch: &str) -> IngestReport {
        let mut report = IngestReport::new();

        if raw_batch.trim().is_empty() {
            debug!("Ignoring empty batch");
            return report;
        }

        for (idx, line) in split_batch(raw_batch).enumerate() {
            let outcome = self.process_line(idx + 1, line).await;
            report.record(&outcome);
        }

        info!(
            lines = report.lines,
            stored = report.stored,
            failed = report.failed(),
            "Batch ingested: {}",
            report.summary()
        );

        report
    }

    /// Run one line through parse, extract, filter and append
    pub async fn process_line(&self, line_number: usize, line: &str) -> LineOutcome {
        let notification = match Notification::from_line(line) {
            Ok(notification) => notification,
            Err(e) => {
                let outcome = LineOutcome::Malformed(e.to_string());
                warn!(
                    line = line_number,
                    reason = outcome.label(),
                    "Skipping notification: {}",
                    e
                );
                return outcome;
            }
        };

        info!(
            line = line_number,
            app = %notification.app_name,
            "Analyzing \"{}\"",
            notification.title
        );

        let result = match self.extractor.extract(&notification.describe()).await {
            Ok(result) => result,
            Err(e) => {
                let outcome = LineOutcome::ExtractionFailed(e.to_string());
                warn!(
                    line = line_number,
                    reason = outcome.label(),
                    "No transaction produced: {}",
                    e
                );
                return outcome;
            }
        };

        let Some(transaction) = Transaction::from_extraction(&notification, result, Utc::now())
        else {
            let outcome = LineOutcome::Rejected;
            info!(
                line = line_number,
                reason = outcome.label(),
                "Skipped, not a money movement: {}",
                notification.title
            );
            return outcome;
        };

        let transaction = match self.append(transaction).await {
            Ok(transaction) => transaction,
            Err(message) => {
                let outcome = LineOutcome::StoreFailed(message.clone());
                error!(
                    line = line_number,
                    reason = outcome.label(),
                    "Failed to append transaction: {}",
                    message
                );
                return outcome;
            }
        };

        let direction = match transaction.kind {
            TransactionType::Income => "INCOME",
            _ => "EXPENSE",
        };
        info!(
            line = line_number,
            "{}: {} | {} | ({})",
            direction,
            transaction.shop,
            transaction.amount,
            transaction.category
        );

        LineOutcome::Stored(transaction.kind)
    }

    /// Append on the blocking pool, handing the transaction back on success
    async fn append(&self, transaction: Transaction) -> Result<Transaction, String> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            store
                .append(&transaction)
                .map(|()| transaction)
                .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| format!("Append task failed: {}", e))?
    }

    /// All stored records, newest first
    ///
    /// Reads the whole file synchronously; async callers should run it on
    /// the blocking pool.
    pub fn list_all(&self) -> Result<Vec<StoredRecord>, S::Error> {
        self.store.list_all()
    }
}
