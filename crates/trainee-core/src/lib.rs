// ABOUTME: Core types crate for the Trainee API
// ABOUTME: Errors, response envelope and domain models with no database or HTTP server dependency
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Trainee Core
//!
//! Shared foundation for the Trainee API crates:
//!
//! - [`errors`]: `AppError`, `ErrorCode`, `FieldError`
//! - [`response`]: the `{success, message, data, errors}` envelope
//! - [`models`]: users, trainer profiles, specializations, reviews, images
//! - [`pagination`]: page/limit parsing shared by list endpoints

/// Application error types
pub mod errors;

/// Domain models
pub mod models;

/// Page requests and pagination metadata
pub mod pagination;

/// JSON response envelope
pub mod response;

pub use errors::{AppError, AppResult, ErrorCode, FieldError};
pub use pagination::{PageRequest, Pagination};
pub use response::ApiResponse;
