// ABOUTME: Email verification routes: verify link, resend and status
// ABOUTME: Raw tokens travel only by email; the database keeps their SHA-256 hash
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::extract::{ApiJson, ApiQuery};
use super::{respond, respond_message};
use crate::constants::messages;
use crate::email::{generate_verification_token, hash_token};
use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::resources::ServerResources;
use crate::validation::normalize_email;

/// Query string of the verification link
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailQuery {
    /// Raw token from the email
    pub token: Option<String>,
    /// Address being verified
    pub email: Option<String>,
}

/// Body of a resend request
#[derive(Debug, Clone, Deserialize)]
pub struct ResendVerificationRequest {
    /// Address to send the link to
    pub email: String,
}

/// Verification state of the caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatus {
    /// Whether the address is verified
    pub is_verified: bool,
    /// Account email
    pub email: String,
    /// When verification completed
    pub email_verified_at: Option<DateTime<Utc>>,
}

/// Issue a new verification token for `user`, replacing any previous one,
/// and email it
///
/// # Errors
///
/// Returns an error if the token cannot be stored or the email cannot be sent
pub(crate) async fn send_verification_email(
    resources: &ServerResources,
    user: &User,
) -> AppResult<()> {
    let (raw, hash) = generate_verification_token();
    let expires_at = Utc::now() + Duration::hours(resources.email.verification_ttl_hours());
    resources
        .database
        .store_email_verification_token(user.id, &hash, expires_at)
        .await?;
    resources.email.send_verification(user, &raw).await
}

fn token_matches(user: &User, raw_token: &str, now: DateTime<Utc>) -> bool {
    let (Some(stored), Some(expires_at)) = (
        user.email_verification_token_hash.as_deref(),
        user.email_verification_expires_at,
    ) else {
        return false;
    };
    expires_at > now && stored == hash_token(raw_token)
}

/// Email verification routes handler
pub struct EmailRoutes;

impl EmailRoutes {
    /// Create email verification routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/email/verify", get(Self::handle_verify))
            .route("/email/resend", post(Self::handle_resend))
            .route("/email/status", get(Self::handle_status))
            .with_state(resources)
    }

    /// Handle GET /email/verify
    #[tracing::instrument(skip(resources, query), fields(route = "verify_email"))]
    async fn handle_verify(
        State(resources): State<Arc<ServerResources>>,
        ApiQuery(query): ApiQuery<VerifyEmailQuery>,
    ) -> Result<Response, AppError> {
        let token = query.token.as_deref().map(str::trim).filter(|t| !t.is_empty());
        let email = query.email.as_deref().map(normalize_email).filter(|e| !e.is_empty());
        let (Some(token), Some(email)) = (token, email) else {
            return Err(AppError::invalid_input("Token and email are required"));
        };

        let user = resources
            .database
            .get_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if user.is_verified {
            return Err(AppError::invalid_input("Email is already verified"));
        }
        if !token_matches(&user, token, Utc::now()) {
            return Err(AppError::invalid_input("Invalid or expired token"));
        }

        resources.database.mark_email_verified(user.id).await?;
        let user = resources.database.get_user_required(user.id).await?;
        info!(user_id = user.id, "Email verified");

        if let Err(e) = resources.email.send_verified_confirmation(&user).await {
            warn!(user_id = user.id, error = %e, "Failed to send verification confirmation");
        }

        Ok(respond(StatusCode::OK, "Email verified successfully", user))
    }

    /// Handle POST /email/resend
    #[tracing::instrument(skip(resources, request), fields(route = "resend_verification"))]
    async fn handle_resend(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(request): ApiJson<ResendVerificationRequest>,
    ) -> Result<Response, AppError> {
        let email = normalize_email(&request.email);
        let Some(user) = resources.database.get_user_by_email(&email).await? else {
            return Ok(respond_message(
                StatusCode::OK,
                messages::VERIFICATION_RESEND_GENERIC,
            ));
        };

        if user.is_verified {
            return Err(AppError::invalid_input("Email is already verified"));
        }

        send_verification_email(&resources, &user).await?;
        info!(user_id = user.id, "Verification email resent");
        Ok(respond_message(
            StatusCode::OK,
            messages::VERIFICATION_RESEND_GENERIC,
        ))
    }

    /// Handle GET /email/status
    async fn handle_status(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        let status = VerificationStatus {
            is_verified: auth.user.is_verified,
            email: auth.user.email,
            email_verified_at: auth.user.email_verified_at,
        };
        Ok(respond(
            StatusCode::OK,
            "Verification status retrieved",
            status,
        ))
    }
}
