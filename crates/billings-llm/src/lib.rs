//! Billings LLM Provider Layer
//!
//! Completion providers and credential sources for the extraction client.
//!
//! # Architecture
//!
//! This crate provides implementations of the `CompletionProvider` and
//! `CredentialProvider` traits from `billings-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenRouterProvider`: OpenAI-compatible chat-completion endpoint
//!
//! # Examples
//!
//! ```
//! use billings_llm::MockProvider;
//! use billings_domain::traits::CompletionProvider;
//!
//! # async fn example() {
//! let provider = MockProvider::new(r#"{"type":"none"}"#);
//! let result = provider.complete("system", "test prompt").await.unwrap();
//! assert_eq!(result, r#"{"type":"none"}"#);
//! # }
//! ```

#![warn(missing_docs)]

pub mod credentials;
pub mod openrouter;

use billings_domain::traits::CompletionProvider;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

pub use credentials::{CredentialError, EnvCredential, SecretsFile, StaticCredential};
pub use openrouter::OpenRouterProvider;

/// Errors that can occur during completion calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// No usable credential; no request was sent
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Endpoint answered with a non-success status
    #[error("API error {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, kept for logging
        body: String,
    },

    /// Response did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

/// Mock completion provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network
/// calls. Specific replies are selected by a substring of the prompt; the
/// first registered match wins.
///
/// # Examples
///
/// ```
/// use billings_llm::MockProvider;
/// use billings_domain::traits::CompletionProvider;
///
/// # async fn example() {
/// let mut provider = MockProvider::default();
/// provider.add_response("Groceries", r#"{"type":"expense"}"#);
/// provider.add_error("Broken");
///
/// let reply = provider.complete("sys", "Text: Groceries Inc").await.unwrap();
/// assert_eq!(reply, r#"{"type":"expense"}"#);
/// assert!(provider.complete("sys", "Broken app").await.is_err());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    replies: Arc<Mutex<Vec<(String, MockReply)>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            replies: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Reply with `response` to prompts containing `needle`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((needle.into(), MockReply::Text(response.into())));
    }

    /// Fail prompts containing `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((needle.into(), MockReply::Error));
    }

    /// Sleep before answering, to exercise timeouts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reset the recorded prompts
    pub fn reset_call_count(&self) {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn reply_for(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        let replies = self.replies.lock().unwrap_or_else(PoisonError::into_inner);
        match replies
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
        {
            Some((_, MockReply::Text(response))) => Ok(response.clone()),
            Some((_, MockReply::Error)) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(r#"{"type":"none"}"#)
    }
}

impl CompletionProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, _system: &str, prompt: &str) -> Result<String, Self::Error> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply_for(prompt)
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete("sys", "any prompt").await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::new("fallback");
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.complete("sys", "say hello").await.unwrap(), "world");
        assert_eq!(provider.complete("sys", "foo!").await.unwrap(), "bar");
        assert_eq!(provider.complete("sys", "unknown").await.unwrap(), "fallback");
    }

    #[tokio::test]
    async fn test_mock_provider_first_match_wins() {
        let mut provider = MockProvider::default();
        provider.add_response("Bank", "first");
        provider.add_response("Bank: Payment", "second");

        assert_eq!(provider.complete("sys", "Bank: Payment").await.unwrap(), "first");
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);

        provider.complete("sys", "prompt1").await.unwrap();
        assert_eq!(provider.call_count(), 1);

        provider.complete("sys", "prompt2").await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.prompts(), vec!["prompt1", "prompt2"]);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.complete("sys", "bad prompt").await;
        assert!(matches!(result, Err(LlmError::Other(_))));
    }

    #[tokio::test]
    async fn test_mock_provider_clone() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete("sys", "test").await.unwrap();

        // Both should share the same call count due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_api_error_display_carries_status_and_body() {
        let err = LlmError::Api {
            status: 401,
            body: "invalid key".to_string(),
        };
        assert_eq!(err.to_string(), "API error 401: invalid key");
    }
}
