//! Footprint Service Library
//!
//! HTTP handlers and types for the footprint extraction service.
//! This library is used by both the footprint-service binary and
//! integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use footprint::FootprintConfig;

/// Application state shared across handlers.
pub struct AppState {
    /// Extraction defaults, overridable per request.
    pub config: FootprintConfig,
}

/// Build the service router without middleware, for the binary and tests.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health_check))
        .route("/footprint", post(handlers::post_footprint))
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{ErrorResponse, FootprintRequest, HealthResponse, ServiceInfoResponse};
