// ABOUTME: Route module organization for the Trainee API HTTP endpoints
// ABOUTME: One router per domain, merged by the server into a single application
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the Trainee API
//!
//! Each domain module exposes a `XRoutes::routes(resources)` constructor and
//! thin handlers that authenticate, validate and delegate to the database
//! managers. Every body is wrapped in [`ApiResponse`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::response::ApiResponse;

// ═══════════════════════════════════════════════════════════════
// Core infrastructure
// ═══════════════════════════════════════════════════════════════

/// Health check routes
pub mod health;

/// Extractors with envelope-shaped rejections
pub mod extract;

// ═══════════════════════════════════════════════════════════════
// Accounts
// ═══════════════════════════════════════════════════════════════

/// Registration, login, profile and token refresh
pub mod auth;

/// Email verification routes
pub mod email;

/// User profile routes
pub mod users;

// ═══════════════════════════════════════════════════════════════
// Marketplace
// ═══════════════════════════════════════════════════════════════

/// Trainer profile and search routes
pub mod trainers;

/// Trainer review routes
pub mod reviews;

/// Specialization catalog routes
pub mod specializations;

/// Trainer-to-specialization link routes
pub mod trainer_specializations;

/// Profile picture and gallery image routes
pub mod images;

pub use auth::AuthRoutes;
pub use email::EmailRoutes;
pub use health::HealthRoutes;
pub use images::ImageRoutes;
pub use reviews::ReviewRoutes;
pub use specializations::SpecializationRoutes;
pub use trainer_specializations::TrainerSpecializationRoutes;
pub use trainers::TrainerRoutes;
pub use users::UserRoutes;

/// Render a success envelope carrying `data`
pub(crate) fn respond<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    (status, Json(ApiResponse::success(message, data))).into_response()
}

/// Render a success envelope with only a message
pub(crate) fn respond_message(status: StatusCode, message: &str) -> Response {
    (status, Json(ApiResponse::message_only(message))).into_response()
}

/// Parse a numeric path segment, mapping failure to `on_error`
pub(crate) fn parse_id(raw: &str, on_error: impl FnOnce() -> AppError) -> Result<i64, AppError> {
    raw.trim().parse::<i64>().map_err(|_| on_error())
}
