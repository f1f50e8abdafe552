//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{StoredRecord, Transaction};
use std::future::Future;

/// Trait for resolving the API credential used by the extraction model
///
/// Implemented by the infrastructure layer (billings-llm)
pub trait CredentialProvider {
    /// Error type for credential resolution
    type Error;

    /// Resolve the credential; called once per outbound request
    fn resolve_credential(&self) -> Result<String, Self::Error>;
}

/// Trait for text-completion providers
///
/// Implemented by the infrastructure layer (billings-llm)
pub trait CompletionProvider {
    /// Error type for completion calls
    type Error;

    /// Send a system instruction and a user prompt, returning the completion text
    fn complete(
        &self,
        system: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Name of the model answering the prompts
    fn model_name(&self) -> &str;
}

/// Trait for the append-only transaction store
///
/// Implemented by the infrastructure layer (billings-store)
pub trait TransactionStore {
    /// Error type for store operations
    type Error;

    /// Append one transaction; existing records are never rewritten
    fn append(&self, transaction: &Transaction) -> Result<(), Self::Error>;

    /// All stored records, most recently appended first
    fn list_all(&self) -> Result<Vec<StoredRecord>, Self::Error>;
}
