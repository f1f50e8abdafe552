//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files: bind address, store location, secrets
//! file, completion endpoint and the nested `[extractor]` table. Every field
//! has a default, so an empty file is a valid configuration.

use billings_extractor::ExtractorConfig;
use billings_llm::credentials::{DEFAULT_SECRETS_FILE, DEFAULT_SECRET_KEY};
use billings_llm::openrouter::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use billings_store::DEFAULT_STORE_FILE;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A field holds an unusable value
    #[error("Invalid configuration field {field}: {reason}")]
    Invalid {
        /// Field name
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 5000)
    pub bind_port: u16,

    /// JSONL transaction store
    pub store_path: PathBuf,

    /// JSON file holding the completion API key
    pub secrets_path: PathBuf,

    /// Property of the secrets file that holds the key
    pub secret_key: String,

    /// Chat-completion URL
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Optional `HTTP-Referer` sent with each completion request
    pub referer: Option<String>,

    /// HTTP request timeout for the completion client (seconds)
    pub request_timeout_secs: u64,

    /// Extraction limits
    pub extractor: ExtractorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 5000,
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            secrets_path: PathBuf::from(DEFAULT_SECRETS_FILE),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            referer: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            extractor: ExtractorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_port == 0 {
            return Err(invalid("bind_port", "must be greater than 0"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(invalid("endpoint", "must not be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(invalid("model", "must not be empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs", "must be greater than 0"));
        }
        self.extractor
            .validate()
            .map_err(|reason| invalid("extractor", &reason))
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_port: 8080,
            secrets_path: PathBuf::from("test-secrets.json"),
            store_path: PathBuf::from("test-transactions.jsonl"),
            ..ServerConfig::default()
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// HTTP request timeout for the completion client
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
