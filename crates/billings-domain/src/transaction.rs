//! Transaction module - a persisted, classified financial event

use crate::{ExtractionResult, Notification, TransactionType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A classified expense or income
///
/// Transactions are immutable once appended to the store. The only way to
/// build one from pipeline data is [`Transaction::from_extraction`], which
/// refuses results classified as [`TransactionType::None`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Time the transaction was recorded
    pub date: DateTime<Utc>,

    /// App that raised the notification
    pub app: String,

    /// Shop or counterparty reported by the model
    pub shop: String,

    /// Original notification text
    pub raw_text: String,

    /// Amount without currency
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Spending category reported by the model
    pub category: String,

    /// Expense or income
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl Transaction {
    /// Combine a notification with its extraction result
    ///
    /// Returns `None` when the result was classified as not financial.
    pub fn from_extraction(
        notification: &Notification,
        result: ExtractionResult,
        date: DateTime<Utc>,
    ) -> Option<Self> {
        if !result.is_accepted() {
            return None;
        }

        Some(Self {
            date,
            app: notification.app_name.clone(),
            shop: result.shop,
            raw_text: notification.text.clone(),
            amount: result.amount,
            category: result.category,
            kind: result.kind,
        })
    }
}
