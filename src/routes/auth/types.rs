// ABOUTME: Request and response types for authentication routes
// ABOUTME: Registration, login and token payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Authentication request and response types

use serde::{Deserialize, Serialize};

use crate::models::User;

/// User registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Email address, normalized to lowercase
    pub email: String,
    /// Plain-text password (hashed before storage)
    pub password: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Romanian mobile number
    pub phone: Option<String>,
    /// `client` (default) or `trainer`
    pub role: Option<String>,
}

/// User login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// Registration and login response
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// The authenticated user
    pub user: User,
    /// Bearer token
    pub token: String,
}

/// Token refresh response
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    /// Fresh bearer token
    pub token: String,
}
