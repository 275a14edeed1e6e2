use crate::config::Config;
use crate::store::PropertyStore;
use axum::{http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Row-store for accepted listings.
    pub store: Arc<dyn PropertyStore>,
    /// Application configuration.
    pub config: Config,
}

/// Health check endpoint.
///
/// Returns the service status, name and version.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "property-webhook-api",
            "version": "0.1.0"
        })),
    )
}
