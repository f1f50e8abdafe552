//! Billings Extractor
//!
//! Classifies a phone notification and extracts transaction fields using an
//! LLM.
//!
//! # Overview
//!
//! The Extractor sends a fixed classification prompt embedding the
//! notification description to a completion provider, cleans up the answer
//! (models like to wrap JSON in markdown fences) and parses it into an
//! `ExtractionResult`.
//!
//! # Architecture
//!
//! ```text
//! Description → PromptBuilder → CompletionProvider → strip fence → ExtractionResult
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use billings_extractor::{Extractor, ExtractorConfig};
//! use billings_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(
//!     r#"{"shop":"Groceries Inc","amount":42.5,"category":"Groceries","type":"expense"}"#,
//! );
//! let extractor = Extractor::new(llm, ExtractorConfig::default());
//!
//! let result = extractor
//!     .extract("App: Bank, Title: Payment, Text: You paid $42.50 at Groceries Inc")
//!     .await?;
//!
//! println!("{} {} ({})", result.kind, result.amount, result.category);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;


pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use parser::{parse_llm_response, strip_code_fence};
pub use prompt::{PromptBuilder, SYSTEM_INSTRUCTION};
