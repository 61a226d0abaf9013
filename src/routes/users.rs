// ABOUTME: User profile routes
// ABOUTME: PUT /users/profile applies a validated partial update to the caller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::put;
use axum::Router;
use serde::Deserialize;
use tracing::info;

use super::extract::ApiJson;
use super::respond;
use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use crate::models::UserProfileUpdate;
use crate::resources::ServerResources;
use crate::validation::{check_http_url, check_name, check_phone, normalize_phone};

/// Partial profile update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Romanian mobile number
    pub phone: Option<String>,
    /// Absolute http(s) URL of a profile picture
    pub profile_image_url: Option<String>,
}

impl UpdateProfileRequest {
    /// Validate and normalize into a database update
    ///
    /// # Errors
    ///
    /// Returns 400 with field errors for any invalid field
    pub fn into_update(self) -> AppResult<UserProfileUpdate> {
        let mut errors = Vec::new();

        let first_name = self.first_name.map(|v| v.trim().to_owned());
        if let Some(value) = &first_name {
            check_name(&mut errors, "firstName", value);
        }
        let last_name = self.last_name.map(|v| v.trim().to_owned());
        if let Some(value) = &last_name {
            check_name(&mut errors, "lastName", value);
        }
        let phone = self.phone.as_deref().map(normalize_phone);
        if let Some(value) = &phone {
            check_phone(&mut errors, value);
        }
        let profile_image_url = self.profile_image_url.map(|v| v.trim().to_owned());
        if let Some(value) = &profile_image_url {
            check_http_url(&mut errors, "profileImageUrl", value, limits::URL_MAX_CHARS);
        }

        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }
        Ok(UserProfileUpdate {
            first_name,
            last_name,
            phone,
            profile_image_url,
        })
    }
}

/// User routes handler
pub struct UserRoutes;

impl UserRoutes {
    /// Create user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/users/profile", put(Self::handle_update_profile))
            .with_state(resources)
    }

    /// Handle PUT /users/profile
    #[tracing::instrument(skip(resources, headers, body), fields(route = "update_profile"))]
    async fn handle_update_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<ApiJson<UpdateProfileRequest>, AppError>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        let ApiJson(request) = body?;
        let update = request.into_update()?;

        let user = resources
            .database
            .update_user_profile(auth.user_id(), &update)
            .await?;
        info!(user_id = user.id, "Profile updated");

        Ok(respond(StatusCode::OK, "Profile updated successfully", user))
    }
}
