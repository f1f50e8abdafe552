//! Per-batch outcome tracking
//!
//! Every line of a batch ends in exactly one [`LineOutcome`]; the
//! [`IngestReport`] tallies them so the ratio of skipped to stored lines is
//! visible in logs and in the webhook acknowledgement.

use billings_domain::TransactionType;
use serde::Serialize;

/// What happened to one line of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// A transaction of the given type was appended
    Stored(TransactionType),

    /// The model classified the notification as not financial
    Rejected,

    /// The line is not a valid notification
    Malformed(String),

    /// The extraction call failed (credential, transport, API, parse, timeout)
    ExtractionFailed(String),

    /// The transaction could not be appended
    StoreFailed(String),
}

impl LineOutcome {
    /// Short machine-readable label, used as a log field
    pub fn label(&self) -> &'static str {
        match self {
            LineOutcome::Stored(_) => "stored",
            LineOutcome::Rejected => "rejected",
            LineOutcome::Malformed(_) => "malformed",
            LineOutcome::ExtractionFailed(_) => "extraction_failed",
            LineOutcome::StoreFailed(_) => "store_failed",
        }
    }

    /// Whether the line produced a stored transaction
    pub fn is_stored(&self) -> bool {
        matches!(self, LineOutcome::Stored(_))
    }
}

/// Tally of line outcomes for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Non-empty lines seen
    pub lines: usize,

    /// Transactions appended
    pub stored: usize,

    /// Lines classified as not financial
    pub rejected: usize,

    /// Lines that were not valid notifications
    pub malformed: usize,

    /// Lines whose extraction failed
    pub extraction_failed: usize,

    /// Lines whose append failed
    pub store_failed: usize,
}

impl IngestReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one line outcome
    pub fn record(&mut self, outcome: &LineOutcome) {
        self.lines += 1;
        match outcome {
            LineOutcome::Stored(_) => self.stored += 1,
            LineOutcome::Rejected => self.rejected += 1,
            LineOutcome::Malformed(_) => self.malformed += 1,
            LineOutcome::ExtractionFailed(_) => self.extraction_failed += 1,
            LineOutcome::StoreFailed(_) => self.store_failed += 1,
        }
    }

    /// Lines that did not end in a stored transaction
    pub fn skipped(&self) -> usize {
        self.lines - self.stored
    }

    /// Lines that failed for a reason other than an explicit rejection
    pub fn failed(&self) -> usize {
        self.malformed + self.extraction_failed + self.store_failed
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} lines: {} stored, {} rejected, {} malformed, {} extraction failed, {} store failed",
            self.lines,
            self.stored,
            self.rejected,
            self.malformed,
            self.extraction_failed,
            self.store_failed
        )
    }
}
