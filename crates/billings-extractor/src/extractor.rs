//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::prompt::{PromptBuilder, SYSTEM_INSTRUCTION};
use billings_domain::traits::CompletionProvider;
use billings_domain::ExtractionResult;
use std::fmt::Display;
use tokio::time::timeout;
use tracing::debug;

/// The Extractor turns a notification description into an extraction result
pub struct Extractor<L>
where
    L: CompletionProvider,
{
    llm_provider: L,
    config: ExtractorConfig,
}

impl<L> Extractor<L>
where
    L: CompletionProvider + Send + Sync,
    L::Error: Display,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        Self {
            llm_provider,
            config,
        }
    }

    /// Name of the model behind the provider
    pub fn model_name(&self) -> &str {
        self.llm_provider.model_name()
    }

    /// The completion provider
    pub fn provider(&self) -> &L {
        &self.llm_provider
    }

    /// Classify a notification description and extract its fields
    ///
    /// # Errors
    ///
    /// - `TextTooLong` if the description exceeds `max_text_length`
    /// - `Timeout` if the provider does not answer in time
    /// - `Llm` for any provider failure
    /// - `JsonParse` / `InvalidFormat` if the completion cannot be parsed
    pub async fn extract(&self, text: &str) -> Result<ExtractionResult, ExtractorError> {
        let length = text.chars().count();
        if length > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(
                length,
                self.config.max_text_length,
            ));
        }

        let prompt = PromptBuilder::new(text).build();

        debug!("Prompt length: {} chars", prompt.len());

        let llm_response = timeout(
            self.config.extraction_timeout(),
            self.llm_provider.complete(SYSTEM_INSTRUCTION, &prompt),
        )
        .await
        .map_err(|_| ExtractorError::Timeout(self.config.extraction_timeout_secs))?
        .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!("LLM response length: {} chars", llm_response.len());

        parse_llm_response(&llm_response)
    }
}
