//! Credential sources for completion providers
//!
//! The API key is resolved on every request, so a rotated key in the
//! secrets file takes effect without a restart.

use billings_domain::traits::CredentialProvider;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default secrets file name, looked up relative to the working directory
pub const DEFAULT_SECRETS_FILE: &str = "secrets.json";

/// Property holding the API key inside the secrets file
pub const DEFAULT_SECRET_KEY: &str = "OpenRouterApiKey";

/// Errors that can occur while resolving a credential
#[derive(Error, Debug)]
pub enum CredentialError {
    /// Secrets file could not be read
    #[error("Failed to read secrets file {path}: {source}")]
    FileRead {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Secrets file is not valid JSON
    #[error("Failed to parse secrets file: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Key is absent, not a string, or empty
    #[error("Secret '{0}' is missing or empty")]
    MissingKey(String),

    /// Environment variable is unset or empty
    #[error("Environment variable '{0}' is not set")]
    MissingEnv(String),
}

/// Reads the API key from a JSON secrets file
///
/// # Examples
///
/// ```no_run
/// use billings_llm::SecretsFile;
/// use billings_domain::traits::CredentialProvider;
///
/// let secrets = SecretsFile::new("secrets.json");
/// let key = secrets.resolve_credential().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SecretsFile {
    path: PathBuf,
    key: String,
}

impl SecretsFile {
    /// Read `OpenRouterApiKey` from the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: DEFAULT_SECRET_KEY.to_string(),
        }
    }

    /// Read a different property from the file
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Path of the secrets file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for SecretsFile {
    fn default() -> Self {
        Self::new(DEFAULT_SECRETS_FILE)
    }
}

impl CredentialProvider for SecretsFile {
    type Error = CredentialError;

    fn resolve_credential(&self) -> Result<String, Self::Error> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|source| CredentialError::FileRead {
                path: self.path.clone(),
                source,
            })?;

        let doc: Value = serde_json::from_str(&contents)?;

        doc.get(&self.key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .ok_or_else(|| CredentialError::MissingKey(self.key.clone()))
    }
}

/// Reads the API key from an environment variable
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    /// Read the key from `var`
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvCredential {
    type Error = CredentialError;

    fn resolve_credential(&self) -> Result<String, Self::Error> {
        std::env::var(&self.var)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| CredentialError::MissingEnv(self.var.clone()))
    }
}

/// A fixed credential
#[derive(Debug, Clone)]
pub struct StaticCredential(String);

impl StaticCredential {
    /// Always resolve to `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl CredentialProvider for StaticCredential {
    type Error = CredentialError;

    fn resolve_credential(&self) -> Result<String, Self::Error> {
        if self.0.trim().is_empty() {
            return Err(CredentialError::MissingKey("static".to_string()));
        }
        Ok(self.0.clone())
    }
}
