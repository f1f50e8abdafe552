//! OpenRouter Provider Implementation
//!
//! Talks to an OpenAI-compatible chat-completion endpoint (OpenRouter by
//! default).
//!
//! # Features
//!
//! - Async HTTP communication via a reusable `reqwest::Client`
//! - Configurable endpoint, model, referer and timeout
//! - Bearer credential resolved from an injected `CredentialProvider` per call
//!
//! Calls are not retried; a failed call is reported once to the caller.
//!
//! # Examples
//!
//! ```no_run
//! use billings_llm::{OpenRouterProvider, SecretsFile};
//!
//! let provider = OpenRouterProvider::new(
//!     "https://openrouter.ai/api/v1/chat/completions",
//!     "openai/gpt-4o-mini",
//!     SecretsFile::default(),
//! )
//! .unwrap();
//! ```

use crate::LlmError;
use billings_domain::traits::{CompletionProvider, CredentialProvider};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::Duration;
use tracing::debug;

/// Default chat-completion endpoint
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Default timeout for completion requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Chat-completion provider authenticated with a bearer credential
pub struct OpenRouterProvider<C> {
    endpoint: String,
    model: String,
    referer: Option<String>,
    client: reqwest::Client,
    credentials: C,
}

/// Request body for the chat-completion API
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response from the chat-completion API (only the fields we read)
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))
}

impl<C> OpenRouterProvider<C>
where
    C: CredentialProvider,
    C::Error: Display,
{
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: full chat-completion URL
    /// - `model`: model identifier (e.g., "openai/gpt-4o-mini")
    /// - `credentials`: source of the bearer token, consulted on every call
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        credentials: C,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            referer: None,
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            credentials,
        })
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    /// Send an `HTTP-Referer` header identifying the calling site
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Endpoint the provider posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one system + user exchange and return the completion text
    ///
    /// # Errors
    ///
    /// - `MissingCredential` if no key can be resolved (no request is sent)
    /// - `Communication` if the request cannot be sent or read
    /// - `Api` for a non-success status, with the response body
    /// - `InvalidResponse` if `choices[0].message.content` is absent
    pub async fn send(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let api_key = self
            .credentials
            .resolve_credential()
            .map_err(|e| LlmError::MissingCredential(e.to_string()))?;

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let mut request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body);
        if let Some(referer) = &self.referer {
            request = request.header("HTTP-Referer", referer);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        debug!("Completion response length: {} bytes", text.len());
        completion_content(&text)
    }
}

/// Pull `choices[0].message.content` out of a response body
fn completion_content(body: &str) -> Result<String, LlmError> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            LlmError::InvalidResponse("Response has no choices[0].message.content".to_string())
        })
}

impl<C> CompletionProvider for OpenRouterProvider<C>
where
    C: CredentialProvider + Send + Sync,
    C::Error: Display,
{
    type Error = LlmError;

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, Self::Error> {
        self.send(system, prompt).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
