// ABOUTME: Authentication routes: registration, login, profile and token refresh
// ABOUTME: AuthService holds the business logic, AuthRoutes the thin axum handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Authentication routes
//!
//! Registration issues an email verification token alongside the session
//! token. Delivery problems are logged and never fail the registration.

/// Request and response types
pub mod types;

pub use types::{AuthResponse, LoginRequest, RefreshResponse, RegisterRequest};

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tracing::{info, warn};

use super::email::send_verification_email;
use super::extract::ApiJson;
use super::respond;
use crate::constants::messages;
use crate::errors::{AppError, AppResult, FieldError};
use crate::middleware::AuthenticatedUser;
use crate::models::{NewUser, User, UserRole};
use crate::resources::ServerResources;
use crate::validation::{
    check_name, check_password, check_phone, is_valid_email, normalize_email, normalize_phone,
};

/// Authentication service for business logic
#[derive(Clone)]
pub struct AuthService {
    resources: Arc<ServerResources>,
}

impl AuthService {
    /// Creates a new authentication service
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Register a new account
    ///
    /// # Errors
    ///
    /// - 400 with field errors when validation fails
    /// - 409 when the email is taken
    #[tracing::instrument(skip(self, request), fields(route = "register"))]
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let new_user = self.validate_registration(request).await?;

        let user = self.resources.database.create_user(&new_user).await?;
        info!(user_id = user.id, role = user.role.as_str(), "User registered");

        if let Err(e) = send_verification_email(&self.resources, &user).await {
            warn!(user_id = user.id, error = %e, "Failed to send verification email");
        }

        let token = self.resources.auth_manager.generate_token(&user)?;
        Ok(AuthResponse { user, token })
    }

    /// Check the registration body and hash the password
    async fn validate_registration(&self, request: RegisterRequest) -> AppResult<NewUser> {
        let mut errors = Vec::new();

        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            errors.push(FieldError::new("email", "Please provide a valid email"));
        }
        check_password(&mut errors, &request.password);
        check_name(&mut errors, "firstName", &request.first_name);
        check_name(&mut errors, "lastName", &request.last_name);

        let phone = request
            .phone
            .as_deref()
            .map(normalize_phone)
            .filter(|p| !p.is_empty());
        if let Some(phone) = &phone {
            check_phone(&mut errors, phone);
        }

        let role = match request.role.as_deref().map(str::trim) {
            None | Some("") => UserRole::Client,
            Some(raw) => match UserRole::parse(raw) {
                Some(role @ (UserRole::Client | UserRole::Trainer)) => role,
                _ => {
                    errors.push(FieldError::new("role", "Role must be client or trainer"));
                    UserRole::Client
                }
            },
        };

        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        let password_hash = self
            .resources
            .auth_manager
            .hash_password(&request.password)
            .await?;

        Ok(NewUser {
            email,
            password_hash,
            first_name: request.first_name.trim().to_owned(),
            last_name: request.last_name.trim().to_owned(),
            phone,
            role,
        })
    }

    /// Log in with email and password
    ///
    /// # Errors
    ///
    /// Returns 401 "Wrong credentials" for an unknown email, a wrong
    /// password or a deactivated account
    #[tracing::instrument(skip(self, request), fields(route = "login"))]
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&request.email);
        let database = &self.resources.database;

        let Some(user) = database
            .get_user_by_email(&email)
            .await?
            .filter(|u| u.is_active)
        else {
            return Err(AppError::auth_invalid(messages::WRONG_CREDENTIALS));
        };

        let valid = self
            .resources
            .auth_manager
            .verify_password(&request.password, &user.password_hash)
            .await?;
        if !valid {
            warn!(user_id = user.id, "Login with wrong password");
            return Err(AppError::auth_invalid(messages::WRONG_CREDENTIALS));
        }

        database.update_last_login(user.id).await?;
        let user = database.get_user_required(user.id).await?;
        let token = self.resources.auth_manager.generate_token(&user)?;

        info!(user_id = user.id, "User logged in");
        Ok(AuthResponse { user, token })
    }

    /// Issue a fresh token for an authenticated caller
    ///
    /// # Errors
    ///
    /// Returns an internal error if signing fails
    pub fn refresh(&self, user: &User) -> AppResult<RefreshResponse> {
        let token = self.resources.auth_manager.generate_token(user)?;
        Ok(RefreshResponse { token })
    }
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/auth/register", post(Self::handle_register))
            .route("/auth/login", post(Self::handle_login))
            .route("/auth/profile", get(Self::handle_profile))
            .route("/auth/refresh", post(Self::handle_refresh))
            .with_state(resources)
    }

    async fn authenticate(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<AuthenticatedUser, AppError> {
        resources.auth_middleware.authenticate_headers(headers).await
    }

    /// Handle POST /auth/register
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(request): ApiJson<RegisterRequest>,
    ) -> Result<Response, AppError> {
        let response = AuthService::new(resources).register(request).await?;
        Ok(respond(
            StatusCode::CREATED,
            "User registered successfully",
            response,
        ))
    }

    /// Handle POST /auth/login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(request): ApiJson<LoginRequest>,
    ) -> Result<Response, AppError> {
        let response = AuthService::new(resources).login(request).await?;
        Ok(respond(StatusCode::OK, "User logged in successfully", response))
    }

    /// Handle GET /auth/profile
    async fn handle_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources).await?;
        Ok(respond(
            StatusCode::OK,
            "Profile retrieved successfully",
            auth.user,
        ))
    }

    /// Handle POST /auth/refresh
    async fn handle_refresh(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources).await?;
        let response = AuthService::new(resources).refresh(&auth.user)?;
        Ok(respond(StatusCode::OK, "Token refreshed", response))
    }
}
