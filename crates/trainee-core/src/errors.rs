// ABOUTME: Unified application error type with HTTP status mapping
// ABOUTME: AppError, ErrorCode and FieldError shared by every layer of the Trainee API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Application errors
//!
//! Every fallible operation in the API returns [`AppResult`]. The error carries
//! an [`ErrorCode`] that decides the HTTP status, a human readable message and
//! optional per-field validation details.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request was syntactically valid but semantically wrong
    InvalidInput,
    /// One or more fields failed validation
    ValidationFailed,
    /// No credentials were supplied
    AuthRequired,
    /// Credentials were supplied but are wrong
    AuthInvalid,
    /// Credentials were valid but have expired
    AuthExpired,
    /// Authenticated but not allowed to touch the resource
    PermissionDenied,
    /// Resource does not exist
    ResourceNotFound,
    /// Resource would violate a uniqueness rule
    ResourceAlreadyExists,
    /// Uploaded payload exceeds the configured limit
    PayloadTooLarge,
    /// Uploaded payload has a content type we do not accept
    UnsupportedMediaType,
    /// Request took longer than the server allows
    RequestTimeout,
    /// Database operation failed
    DatabaseError,
    /// Object storage operation failed
    StorageError,
    /// Configuration is missing or invalid
    ConfigError,
    /// Anything else
    InternalError,
}

impl ErrorCode {
    /// HTTP status code for this error class
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::ValidationFailed => 400,
            Self::AuthRequired | Self::AuthInvalid | Self::AuthExpired => 401,
            Self::PermissionDenied => 403,
            Self::ResourceNotFound => 404,
            Self::RequestTimeout => 408,
            Self::ResourceAlreadyExists => 409,
            Self::PayloadTooLarge => 413,
            Self::UnsupportedMediaType => 415,
            Self::DatabaseError | Self::StorageError | Self::ConfigError | Self::InternalError => {
                500
            }
        }
    }

    /// Generic description, used in place of internal messages for server errors
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "Invalid input",
            Self::ValidationFailed => "Validation failed",
            Self::AuthRequired => "User is not authenticated",
            Self::AuthInvalid => "Invalid token.",
            Self::AuthExpired => "Token expired.",
            Self::PermissionDenied => "Permission denied",
            Self::ResourceNotFound => "Resource not found",
            Self::ResourceAlreadyExists => "Resource already exists",
            Self::PayloadTooLarge => "Payload too large",
            Self::UnsupportedMediaType => "Unsupported media type",
            Self::RequestTimeout => "Request timed out",
            Self::DatabaseError => "Database operation failed",
            Self::StorageError => "Storage operation failed",
            Self::ConfigError => "Server misconfigured",
            Self::InternalError => "Internal Server Error",
        }
    }

    /// Whether this is a server-side failure whose message must not leak
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        self.http_status() >= 500
    }
}

/// Validation failure for a single request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Request field name (camelCase, as sent by the client)
    pub field: String,
    /// What is wrong with it
    pub message: String,
}

impl FieldError {
    /// Create a field error
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application error
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// Error classification
    pub code: ErrorCode,
    /// Message shown to the client (server errors are masked on render)
    pub message: String,
    /// Per-field validation details
    pub details: Vec<FieldError>,
}

/// Result alias used throughout the API
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create an error with an explicit code
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Attach field-level details
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = details;
        self
    }

    /// 400 with a single message
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// 400 "Validation failed" with field details
    #[must_use]
    pub fn validation(details: Vec<FieldError>) -> Self {
        Self::new(
            ErrorCode::ValidationFailed,
            ErrorCode::ValidationFailed.description(),
        )
        .with_details(details)
    }

    /// 401 for missing credentials
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(
            ErrorCode::AuthRequired,
            ErrorCode::AuthRequired.description(),
        )
    }

    /// 401 for bad credentials
    #[must_use]
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// 401 for expired credentials
    #[must_use]
    pub fn auth_expired() -> Self {
        Self::new(ErrorCode::AuthExpired, ErrorCode::AuthExpired.description())
    }

    /// 403
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// 404
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceNotFound, message)
    }

    /// 409
    #[must_use]
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceAlreadyExists, message)
    }

    /// 413
    #[must_use]
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PayloadTooLarge, message)
    }

    /// 415
    #[must_use]
    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedMediaType, message)
    }

    /// 408
    #[must_use]
    pub fn request_timeout() -> Self {
        Self::new(
            ErrorCode::RequestTimeout,
            ErrorCode::RequestTimeout.description(),
        )
    }

    /// 500 from the database layer
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// 500 from object storage
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// 500 from configuration
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// 500 for everything else
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// HTTP status for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Message safe to return to a client
    #[must_use]
    pub fn public_message(&self) -> &str {
        if self.code.is_server_error() {
            self.code.description()
        } else {
            &self.message
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::internal(format!("JSON serialization failed: {error}"))
    }
}

#[cfg(feature = "http-response")]
mod http_response {
    use axum::extract::rejection::{JsonRejection, QueryRejection};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;
    use tracing::{error, warn};

    use super::AppError;
    use crate::response::ApiResponse;

    impl From<JsonRejection> for AppError {
        fn from(rejection: JsonRejection) -> Self {
            Self::invalid_input(format!("Invalid request body: {}", rejection.body_text()))
        }
    }

    impl From<QueryRejection> for AppError {
        fn from(rejection: QueryRejection) -> Self {
            Self::invalid_input(format!("Invalid query string: {}", rejection.body_text()))
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status =
                StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            if self.code.is_server_error() {
                error!(code = ?self.code, error = %self.message, "Request failed");
            } else {
                warn!(code = ?self.code, error = %self.message, "Request rejected");
            }

            let errors = if self.details.is_empty() {
                None
            } else {
                Some(self.details.clone())
            };
            let body = ApiResponse::<()>::failure(self.public_message(), errors);
            (status, Json(body)).into_response()
        }
    }
}
