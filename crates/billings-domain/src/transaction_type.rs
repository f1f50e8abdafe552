//! Transaction type - the model's classification of a notification

use serde::{Deserialize, Serialize};

/// Classification assigned to a notification by the extraction model
///
/// - Expense: purchase or outgoing transfer
/// - Income: salary, incoming transfer or refund
/// - None: advertisement, authentication code, system message, or anything
///   without a monetary amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money leaving the account
    Expense,

    /// Money arriving in the account
    Income,

    /// Not a financial movement
    #[default]
    None,
}

impl TransactionType {
    /// Get the wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
            TransactionType::None => "none",
        }
    }

    /// Parse a type from a string, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Some(TransactionType::Expense),
            "income" => Some(TransactionType::Income),
            "none" => Some(TransactionType::None),
            _ => None,
        }
    }

    /// Whether a record of this type should be persisted
    pub fn is_financial(&self) -> bool {
        !matches!(self, TransactionType::None)
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid transaction type: {}", s))
    }
}
