//! # Quest HTTP API Module
//!
//! This module implements the HTTP JSON API a browser front-end drives the
//! quest through. It exposes the same command interface as the CLI.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /progress` - Current progress
//! - `GET /map` - Journey map
//! - `POST /start` - Leave the welcome screen
//! - `POST /video` - Acknowledge the introductory video
//! - `POST /stages/{stage}/open` - Open a stage
//! - `POST /stages/{stage}/complete` - Complete a checkbox stage
//! - `POST /email` - Submit the final-stage email
//! - `POST /sound/toggle` - Toggle sound effects
//! - `POST /reset` - Clear progress
//!
//! ## Configuration (Environment Variables)
//!
//! - `QUEST_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)

mod handlers;
mod types;

// Re-export handlers and types for integration tests (via `quest::api::*`)
pub use handlers::{
    complete_stage_handler, email_handler, health_handler, map_handler, open_stage_handler,
    progress_handler, reset_handler, sound_toggle_handler, start_handler, status_for,
    video_handler,
};
pub use types::{
    CommandResponse, EmailRequest, HealthResponse, MapNodeJson, MapResponse, ProgressResponse,
    SoundResponse,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use quest_core::{ProgressTracker, QuestError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Request bodies are tiny; anything larger is rejected.
const MAX_BODY_BYTES: usize = 16 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the tracker.
#[derive(Clone)]
pub struct AppState {
    /// The one tracker; the lock serializes commands.
    pub tracker: Arc<RwLock<ProgressTracker>>,
}

impl AppState {
    /// Create new app state around a tracker.
    #[must_use]
    pub fn new(tracker: ProgressTracker) -> Self {
        Self {
            tracker: Arc::new(RwLock::new(tracker)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `QUEST_CORS_ORIGINS`:
/// - If "*": allows all origins
/// - If not set: localhost only
/// - Otherwise: comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("QUEST_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!("CORS: allowing ALL origins (QUEST_CORS_ORIGINS=*)");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: no valid origins in QUEST_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::debug!("CORS: QUEST_CORS_ORIGINS not set, allowing localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
pub fn create_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer());

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/progress", get(handlers::progress_handler))
        .route("/map", get(handlers::map_handler))
        .route("/start", post(handlers::start_handler))
        .route("/video", post(handlers::video_handler))
        .route("/stages/{stage}/open", post(handlers::open_stage_handler))
        .route(
            "/stages/{stage}/complete",
            post(handlers::complete_stage_handler),
        )
        .route("/email", post(handlers::email_handler))
        .route("/sound/toggle", post(handlers::sound_toggle_handler))
        .route("/reset", post(handlers::reset_handler))
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware)
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Resolves when the process receives Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Start the HTTP server.
pub async fn run_server(addr: &str, tracker: ProgressTracker) -> Result<(), QuestError> {
    let state = AppState::new(tracker);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| QuestError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("quest HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| QuestError::IoError(format!("Server error: {}", e)))
}
