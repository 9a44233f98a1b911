//! HTTP Server
//!
//! Router assembly, shared state, and the error boundary that maps every
//! handler fault onto an HTTP status plus JSON error body. Nothing
//! propagates uncaught past this layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::handlers::{catalog, ranking, summary};

/// Process-wide shared state. The pool is the only long-lived resource;
/// everything else is request-scoped.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

/// Fault taxonomy for the API surface.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Validation fault: required parameter missing or unparsable. No query
    /// is issued.
    #[error("missing required parameter: {0}")]
    MissingParam(&'static str),
    /// Single-entity lookup matched zero rows.
    #[error("{0}")]
    NotFound(String),
    /// Store fault: surfaced opaque, never retried, never partially
    /// fulfilled.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingParam(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/ranking/institutions", get(ranking::institutions))
        .route("/api/ranking/programs", get(ranking::programs))
        .route("/api/ranking/competencies", get(ranking::competencies))
        .route("/api/ranking/value-added", get(ranking::value_added))
        .route("/api/catalog/regions", get(catalog::regions))
        .route("/api/catalog/institutions", get(catalog::institutions))
        .route("/api/catalog/programs", get(catalog::programs))
        .route("/api/summary/institution", get(summary::institution))
        .route("/api/summary/program", get(summary::program))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true, "ts": chrono::Utc::now().to_rfc3339() }))
}

pub async fn run(config: &Config, state: AppState) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("API ready on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
