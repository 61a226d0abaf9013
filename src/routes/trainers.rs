// ABOUTME: Trainer profile routes: create, read, update, delete and public search
// ABOUTME: Profile creation promotes the caller to trainer in the same transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Trainer profile routes
//!
//! A user owns at most one profile. Creating it switches the user's role to
//! `trainer`; deleting it switches the role back to `client` and cascades to
//! the profile's images, reviews and specialization links.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tracing::{info, warn};

use super::extract::{ApiJson, ApiQuery};
use super::{parse_id, respond, respond_message};
use crate::database::{TrainerSearchParams, TrainerSearchQuery};
use crate::errors::{AppError, AppResult};
use crate::middleware::AuthenticatedUser;
use crate::models::{TrainerProfileFields, UserRole};
use crate::resources::ServerResources;

/// Body of POST /trainer/create
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrainerRequest {
    /// Profile fields
    #[serde(flatten)]
    pub fields: TrainerProfileFields,
    /// Specializations to link at beginner level
    #[serde(default)]
    pub specialization_ids: Vec<i64>,
}

/// Body of PUT /trainer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrainerRequest {
    /// Profile fields; absent ones keep their value
    #[serde(flatten)]
    pub fields: TrainerProfileFields,
    /// Whether the trainer accepts new clients
    pub is_available: Option<bool>,
}

/// Normalize and range-check profile fields
fn validated_fields(fields: TrainerProfileFields) -> AppResult<TrainerProfileFields> {
    let fields = fields.normalized();
    let errors = fields.validate();
    if errors.is_empty() {
        Ok(fields)
    } else {
        Err(AppError::validation(errors))
    }
}

/// Trainer routes handler
pub struct TrainerRoutes;

impl TrainerRoutes {
    /// Create trainer routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/trainer/create", post(Self::handle_create))
            .route(
                "/trainer",
                get(Self::handle_get_own)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/trainer/search", get(Self::handle_search))
            .route("/trainer/:trainer_id", get(Self::handle_get))
            .with_state(resources)
    }

    async fn authenticate(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<AuthenticatedUser, AppError> {
        resources.auth_middleware.authenticate_headers(headers).await
    }

    /// Handle POST /trainer/create
    #[tracing::instrument(skip(resources, headers, body), fields(route = "create_trainer"))]
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<ApiJson<CreateTrainerRequest>, AppError>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources).await?;
        let ApiJson(request) = body?;
        let trainers = resources.database.trainers();

        if auth.user.role == UserRole::Trainer {
            return Err(AppError::invalid_input("You are already a trainer"));
        }
        if trainers.get_by_user(auth.user_id()).await?.is_some() {
            return Err(AppError::invalid_input("A trainer profile already exists"));
        }

        let fields = validated_fields(request.fields)?;

        let mut specialization_ids = request.specialization_ids;
        specialization_ids.sort_unstable();
        specialization_ids.dedup();
        if !specialization_ids.is_empty() {
            let unusable = resources
                .database
                .specializations()
                .unusable_ids(&specialization_ids)
                .await?;
            if !unusable.is_empty() {
                warn!(?unusable, "Trainer creation with unknown or inactive specializations");
                return Err(AppError::invalid_input(
                    "One or more specializations are invalid",
                ));
            }
        }

        let profile = trainers
            .create(auth.user_id(), &fields, &specialization_ids)
            .await?;
        info!(trainer_id = profile.id, user_id = auth.user_id(), "Trainer profile created");

        let details = trainers.details(profile).await?;
        Ok(respond(
            StatusCode::CREATED,
            "Trainer profile created successfully",
            details,
        ))
    }

    /// Handle GET /trainer - the caller's own profile
    async fn handle_get_own(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources).await?;
        let trainers = resources.database.trainers();

        let profile = trainers
            .get_by_user(auth.user_id())
            .await?
            .ok_or_else(|| AppError::not_found("Trainer profile not found"))?;

        let details = trainers.details(profile).await?;
        Ok(respond(StatusCode::OK, "Trainer profile retrieved", details))
    }

    /// Handle GET /trainer/:trainer_id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(trainer_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources).await?;
        let trainer_id = parse_id(&trainer_id, || {
            AppError::invalid_input("The trainer id is invalid")
        })?;
        let trainers = resources.database.trainers();

        let mut profile = trainers
            .get(trainer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Trainer not found"))?;

        if profile.user_id != auth.user_id() {
            trainers.increment_views(trainer_id).await?;
            profile.profile_views += 1;
        }

        let details = trainers.details(profile).await?;
        Ok(respond(StatusCode::OK, "Trainer retrieved", details))
    }

    /// Handle PUT /trainer
    #[tracing::instrument(skip(resources, headers, body), fields(route = "update_trainer"))]
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<ApiJson<UpdateTrainerRequest>, AppError>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources).await?;
        let ApiJson(request) = body?;
        let trainers = resources.database.trainers();

        let existing = trainers
            .get_by_user(auth.user_id())
            .await?
            .ok_or_else(|| AppError::not_found("Trainer profile not found"))?;

        let fields = validated_fields(request.fields)?.merged_onto(&existing);
        let profile = trainers
            .update(existing.id, &fields, request.is_available)
            .await?;
        info!(trainer_id = profile.id, "Trainer profile updated");

        let details = trainers.details(profile).await?;
        Ok(respond(
            StatusCode::OK,
            "Trainer profile updated successfully",
            details,
        ))
    }

    /// Handle DELETE /trainer
    #[tracing::instrument(skip(resources, headers), fields(route = "delete_trainer"))]
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources).await?;
        let trainers = resources.database.trainers();

        let profile = trainers
            .get_by_user(auth.user_id())
            .await?
            .ok_or_else(|| AppError::not_found("No trainer profile found"))?;
        let images = resources.database.images().list_for_trainer(profile.id).await?;

        if !trainers.delete_for_user(auth.user_id()).await? {
            return Err(AppError::not_found("No trainer profile found"));
        }
        info!(trainer_id = profile.id, user_id = auth.user_id(), "Trainer profile deleted");

        for image in images {
            let Some(key) = resources.image_store.key_from_url(&image.image_url) else {
                continue;
            };
            if let Err(e) = resources.image_store.delete(&key).await {
                warn!(key, error = %e, "Failed to delete trainer image object");
            }
        }

        Ok(respond_message(
            StatusCode::OK,
            "Trainer profile deleted successfully",
        ))
    }

    /// Handle GET /trainer/search - public
    #[tracing::instrument(skip(resources, params), fields(route = "search_trainers"))]
    async fn handle_search(
        State(resources): State<Arc<ServerResources>>,
        ApiQuery(params): ApiQuery<TrainerSearchParams>,
    ) -> Result<Response, AppError> {
        let query = TrainerSearchQuery::from_params(&params)?;
        let page = resources.database.trainers().search(&query).await?;
        Ok(respond(StatusCode::OK, "Trainers retrieved", page))
    }
}
