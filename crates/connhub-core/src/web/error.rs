//! HTTP error handling for the web API.
//!
//! This module provides conversion from core library errors to appropriate
//! HTTP responses with JSON error bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::Error;

/// API error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// HTTP status sent with the body
    #[serde(skip)]
    pub status: StatusCode,
    /// Error code (e.g., "E001" for file not found)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable error message
    pub message: String,
    /// Additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Create a new API error with a status and message.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code: None,
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the error.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Create a payload too large error.
    #[must_use]
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, message)
    }

    /// Create an internal server error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{} ({})", self.message, self.status);
        } else {
            tracing::debug!("{} ({})", self.message, self.status);
        }

        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::FileNotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidFileName(_) | Error::UndecodableName(_) => StatusCode::BAD_REQUEST,
            Error::StorageUnavailable { .. } | Error::PortInUse(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Error::ReplaceFailed { .. } | Error::ConfigError(_) | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            code: err.code().map(String::from),
            message: err.to_string(),
            details: None,
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(format!("I/O error: {err}"))
    }
}

/// Result type for web handlers.
pub type ApiResult<T> = Result<T, ApiError>;
