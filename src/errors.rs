use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::webhook_handler::CORS_HEADERS;

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// The request body could not be parsed into a payload.
    Payload(String),
    /// Database-related errors.
    Database(sqlx::Error),
    /// Internal server error.
    Internal(String),
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Payload(msg) => write!(f, "Payload error: {}", msg),
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into the webhook failure response.
    ///
    /// The webhook contract knows only two terminal states; anything that
    /// escapes the per-row loop is a request-level failure. Database and
    /// internal detail stays in the logs, payload parse messages are safe
    /// to echo back.
    fn into_response(self) -> Response {
        let error_message = match &self {
            AppError::Payload(msg) => msg.clone(),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "internal server error".to_string()
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, CORS_HEADERS, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    /// Converts a `sqlx::Error` into an `AppError`.
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}
