// ABOUTME: Request middleware for the Trainee API
// ABOUTME: Bearer-token authentication shared by every protected route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Bearer-token authentication
pub mod auth;

pub use auth::{AuthMiddleware, AuthenticatedUser};
