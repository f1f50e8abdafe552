//! HTTP request handlers for the webhook service.
//!
//! Implements batch ingestion, transaction listing and health check endpoints
//! using axum.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router as AxumRouter,
};
use billings_domain::traits::CompletionProvider;
use billings_domain::StoredRecord;
use billings_ingest::{IngestReport, Pipeline};
use billings_store::{JsonlStore, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, error};

/// Shared application state
pub struct AppState<L: CompletionProvider> {
    /// Ingestion pipeline backed by the JSONL store
    pub pipeline: Arc<Pipeline<L, JsonlStore>>,
}

impl<L: CompletionProvider> AppState<L> {
    /// Wrap a pipeline for sharing across requests
    pub fn new(pipeline: Pipeline<L, JsonlStore>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

impl<L: CompletionProvider> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Location of the transaction store
    pub store_path: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// The store could not be read
    Store(StoreError),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

/// POST /api/webhook - Ingest a batch of line-delimited notifications
///
/// Always answers 200; per-line problems are counted in the report.
async fn ingest_batch<L>(State(state): State<AppState<L>>, body: String) -> Json<IngestReport>
where
    L: CompletionProvider + Send + Sync + 'static,
    L::Error: Display,
{
    debug!(bytes = body.len(), "Received notification batch");
    Json(state.pipeline.ingest(&body).await)
}

/// GET /api/webhook - All stored transactions, newest first
async fn list_transactions<L>(
    State(state): State<AppState<L>>,
) -> Result<Json<Vec<StoredRecord>>, AppError>
where
    L: CompletionProvider + Send + Sync + 'static,
    L::Error: Display,
{
    let pipeline = Arc::clone(&state.pipeline);
    let records = tokio::task::spawn_blocking(move || pipeline.list_all())
        .await
        .map_err(|e| AppError::Internal(format!("Store read task failed: {}", e)))?
        .map_err(|e| {
            error!("Failed to read transaction store: {}", e);
            AppError::from(e)
        })?;
    Ok(Json(records))
}

/// GET /health - Liveness check
async fn health_check<L>(State(state): State<AppState<L>>) -> Json<HealthCheckResponse>
where
    L: CompletionProvider + Send + Sync + 'static,
    L::Error: Display,
{
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        store_path: state.pipeline.store().path().display().to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router<L>(state: AppState<L>) -> AxumRouter
where
    L: CompletionProvider + Send + Sync + 'static,
    L::Error: Display,
{
    AxumRouter::new()
        .route(
            "/api/webhook",
            get(list_transactions::<L>).post(ingest_batch::<L>),
        )
        .route("/health", get(health_check::<L>))
        .with_state(state)
}
