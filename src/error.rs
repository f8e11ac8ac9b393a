//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// All errors that can occur in the application are represented by this enum.
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// The Gemini API key is not configured; chat routes are disabled
    #[error("API key not configured")]
    ApiKeyMissing,

    /// The chat request carried an empty or missing message
    #[error("No message provided")]
    EmptyMessage,

    /// Upstream returned a non-success HTTP status
    #[error("API request failed: {status}")]
    UpstreamStatus {
        /// HTTP status code returned by the upstream service
        status: u16,
        /// Upstream error body, passed through as the error detail
        body: String,
    },

    /// Upstream call exceeded the configured timeout
    #[error("Request timeout")]
    UpstreamTimeout,

    /// Network-level failure reaching the upstream service
    #[error("Network error")]
    UpstreamTransport(String),

    /// Upstream response did not contain a usable text payload
    #[error("Invalid API response format")]
    UpstreamFormat(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Human-readable detail message paired with the error label
    fn detail(&self) -> String {
        match self {
            AppError::ApiKeyMissing => {
                "Please set GEMINI_API_KEY in your environment".to_string()
            }
            AppError::EmptyMessage => "Request body must contain a non-empty message".to_string(),
            AppError::UpstreamStatus { body, .. } => body.clone(),
            AppError::UpstreamTimeout => "The request took too long to process".to_string(),
            AppError::UpstreamTransport(detail) => detail.clone(),
            AppError::UpstreamFormat(detail) => detail.clone(),
            AppError::Internal(e) => e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::EmptyMessage => StatusCode::BAD_REQUEST,
            // Everything else surfaces as a server-side failure, including
            // upstream timeouts, matching the single-user UI contract.
            AppError::ApiKeyMissing
            | AppError::UpstreamStatus { .. }
            | AppError::UpstreamTimeout
            | AppError::UpstreamTransport(_)
            | AppError::UpstreamFormat(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "message": self.detail(),
        }));

        (status, body).into_response()
    }
}
