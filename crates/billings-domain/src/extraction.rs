//! Extraction result - structured data the model pulled out of a notification

use crate::TransactionType;
use rust_decimal::Decimal;

/// Shop name used when the model does not report one
pub const DEFAULT_SHOP: &str = "Unknown";

/// Category used when the model does not report one
pub const DEFAULT_CATEGORY: &str = "Other";

/// Classification and fields extracted from one notification
///
/// Transient: produced by the extraction client and consumed by the
/// ingestion pipeline. Missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    /// Where the money was spent or where it came from
    pub shop: String,

    /// Amount without currency
    pub amount: Decimal,

    /// Free-form spending category (e.g. "Groceries")
    pub category: String,

    /// Classification of the notification
    pub kind: TransactionType,
}

impl Default for ExtractionResult {
    fn default() -> Self {
        Self {
            shop: DEFAULT_SHOP.to_string(),
            amount: Decimal::ZERO,
            category: DEFAULT_CATEGORY.to_string(),
            kind: TransactionType::None,
        }
    }
}

impl ExtractionResult {
    /// Whether the pipeline should turn this result into a transaction
    pub fn is_accepted(&self) -> bool {
        self.kind.is_financial()
    }
}
