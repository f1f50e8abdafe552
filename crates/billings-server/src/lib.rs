//! Billings Server
//!
//! HTTP surface for the notification pipeline. Phones post batches of
//! notifications to `/api/webhook`; the same path lists every stored
//! transaction, newest first.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use billings_extractor::Extractor;
use billings_ingest::Pipeline;
use billings_llm::{LlmError, OpenRouterProvider, SecretsFile};
use billings_store::JsonlStore;
use config::ServerConfig;
use handlers::{create_router, AppState};
use tokio::net::TcpListener;
use tracing::info;

/// Completion provider used by the running server
pub type ServerProvider = OpenRouterProvider<SecretsFile>;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Completion client could not be built
    #[error("Completion client error: {0}")]
    Llm(#[from] LlmError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the application state from configuration
///
/// The secrets file is not read here; it is consulted on every extraction,
/// so a server started without one still answers listing and health checks.
pub fn build_state(config: &ServerConfig) -> Result<AppState<ServerProvider>, ServerError> {
    let credentials = SecretsFile::new(&config.secrets_path).with_key(&config.secret_key);

    let mut provider = OpenRouterProvider::new(&config.endpoint, &config.model, credentials)?
        .with_timeout(config.request_timeout())?;
    if let Some(referer) = &config.referer {
        provider = provider.with_referer(referer);
    }

    let extractor = Extractor::new(provider, config.extractor.clone());
    let store = JsonlStore::new(&config.store_path);

    Ok(AppState::new(Pipeline::new(extractor, store)))
}

/// Start the HTTP server
///
/// Builds the pipeline from configuration, binds the listener and serves
/// until the process is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting Billings server");
    info!("Bind address: {}", config.bind_addr());
    info!("Store: {}", config.store_path.display());
    info!("Model: {} via {}", config.model, config.endpoint);

    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
