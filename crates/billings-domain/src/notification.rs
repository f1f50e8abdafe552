//! Notification module - a single phone/app alert submitted for classification

use serde::{Deserialize, Deserializer};

/// A raw notification as captured on the phone
///
/// Every field defaults to an empty string when absent (or `null`) in the
/// inbound JSON line. Notifications are never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Name of the app that raised the notification (e.g. "Bank")
    #[serde(default, deserialize_with = "null_as_empty")]
    pub app_name: String,

    /// Notification title
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    /// Notification body text
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
}

impl Notification {
    /// Create a notification from its three parts
    pub fn new(
        app_name: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            title: title.into(),
            text: text.into(),
        }
    }

    /// Parse one line of an inbound batch
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Compose the description handed to the extraction model
    ///
    /// All three fields are included, always in the same order.
    pub fn describe(&self) -> String {
        format!(
            "App: {}, Title: {}, Text: {}",
            self.app_name, self.title, self.text
        )
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
