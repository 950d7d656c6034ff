//! Error types and error handling for the application
//!
//! This module defines the errors that reach the HTTP boundary. Upstream
//! provider and relay failures have their own types and are recovered before
//! they get here; only client input errors and unexpected internal failures
//! become error responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required field is missing or blank
    #[error("{0}")]
    MissingField(String),

    /// The request body could not be parsed
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl AppError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingField(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let AppError::Internal(e) = &self {
            tracing::error!(error = %e, "Request failed with internal error");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

/// Turn a panic caught by `CatchPanicLayer` into a JSON 500 response
///
/// The panic payload is logged but never sent to the client.
pub fn panic_response(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    AppError::Internal(anyhow::anyhow!("Server error")).into_response()
}
