// ABOUTME: Authenticates requests from the Authorization header
// ABOUTME: Validates the bearer JWT and loads the active user it names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use tracing::debug;

use crate::auth::{AuthManager, Claims};
use crate::constants::messages;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// The caller of an authenticated request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Current user row
    pub user: User,
    /// Claims from the presented token
    pub claims: Claims,
}

impl AuthenticatedUser {
    /// Caller's user id
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.user.id
    }
}

/// Bearer-token authentication
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: Arc<AuthManager>,
    database: Arc<Database>,
}

impl AuthMiddleware {
    /// Create the middleware
    #[must_use]
    pub const fn new(auth_manager: Arc<AuthManager>, database: Arc<Database>) -> Self {
        Self {
            auth_manager,
            database,
        }
    }

    /// Authenticate from request headers
    ///
    /// # Errors
    ///
    /// See [`Self::authenticate_request`]
    pub async fn authenticate_headers(&self, headers: &HeaderMap) -> AppResult<AuthenticatedUser> {
        let value = headers
            .get(header::AUTHORIZATION)
            .map(|v| v.to_str().map_err(|_| AppError::auth_invalid("Invalid token.")))
            .transpose()?;
        self.authenticate_request(value).await
    }

    /// Authenticate an `Authorization` header value
    ///
    /// # Errors
    ///
    /// - no header: "User is not authenticated"
    /// - not a bearer token or bad signature: "Invalid token."
    /// - expired: "Token expired."
    /// - user missing or deactivated: "User not authenticated"
    pub async fn authenticate_request(
        &self,
        auth_header: Option<&str>,
    ) -> AppResult<AuthenticatedUser> {
        let auth_header = auth_header.ok_or_else(AppError::auth_required)?;
        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::auth_invalid("Invalid token."))?;

        let claims = self.auth_manager.validate_token(token)?;
        let user_id = claims.user_id()?;

        let user = self
            .database
            .get_user(user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| {
                debug!(user_id, "Token names a missing or inactive user");
                AppError::auth_invalid(messages::USER_NOT_AUTHENTICATED)
            })?;

        Ok(AuthenticatedUser { user, claims })
    }
}
