// ABOUTME: Trainer review routes: create, list, update and delete
// ABOUTME: Every write recomputes the trainer's rating aggregate in the same transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::extract::{ApiJson, ApiQuery};
use super::{parse_id, respond, respond_message};
use crate::constants::messages;
use crate::errors::{AppError, AppResult};
use crate::models::{ReviewInput, ReviewWithClient};
use crate::pagination::{PageRequest, Pagination};
use crate::resources::ServerResources;

/// `page` and `limit` query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
}

impl PageQuery {
    /// Parse into a page request
    ///
    /// # Errors
    ///
    /// Returns 400 with field errors for non-numeric values
    pub fn parse(&self) -> AppResult<PageRequest> {
        let mut errors = Vec::new();
        let page = PageRequest::parse(self.page.as_deref(), self.limit.as_deref(), &mut errors);
        if errors.is_empty() {
            Ok(page)
        } else {
            Err(AppError::validation(errors))
        }
    }
}

/// A page of reviews
#[derive(Debug, Clone, Serialize)]
pub struct ReviewsPage {
    /// Reviews, newest first
    pub reviews: Vec<ReviewWithClient>,
    /// Pagination metadata
    pub pagination: Pagination,
}

fn validated_input(input: ReviewInput) -> AppResult<ReviewInput> {
    let input = input.normalized();
    let errors = input.validate();
    if errors.is_empty() {
        Ok(input)
    } else {
        Err(AppError::validation(errors))
    }
}

fn parse_review_id(raw: &str) -> AppResult<i64> {
    parse_id(raw, || AppError::invalid_input("The review id is invalid"))
}

/// Review routes handler
///
/// Axum cannot name one path segment differently per method, so the single
/// `:id` segment is a trainer id for POST/GET and a review id for PUT/DELETE.
pub struct ReviewRoutes;

impl ReviewRoutes {
    /// Create review routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/reviews/:id",
                get(Self::handle_list)
                    .post(Self::handle_create)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle POST /reviews/:trainer_id
    #[tracing::instrument(skip(resources, headers, body), fields(route = "create_review"))]
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(trainer_id): Path<String>,
        body: Result<ApiJson<ReviewInput>, AppError>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        let ApiJson(input) = body?;
        let trainer_id = parse_id(&trainer_id, || {
            AppError::invalid_input(messages::TRAINER_DOES_NOT_EXIST)
        })?;

        let trainer = resources
            .database
            .trainers()
            .get(trainer_id)
            .await?
            .ok_or_else(|| AppError::invalid_input(messages::TRAINER_DOES_NOT_EXIST))?;

        if trainer.user_id == auth.user_id() {
            return Err(AppError::invalid_input("Trainers cannot review themselves"));
        }

        let reviews = resources.database.reviews();
        if reviews.exists_for(trainer_id, auth.user_id()).await? {
            return Err(AppError::invalid_input(
                "You already left a review for this trainer",
            ));
        }

        let input = validated_input(input)?;
        let review = reviews.create(trainer_id, auth.user_id(), &input).await?;
        info!(review_id = review.review.id, trainer_id, "Review created");

        Ok(respond(StatusCode::CREATED, "Review created", review))
    }

    /// Handle GET /reviews/:trainer_id - public
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Path(trainer_id): Path<String>,
        ApiQuery(query): ApiQuery<PageQuery>,
    ) -> Result<Response, AppError> {
        let trainer_id = parse_id(&trainer_id, || {
            AppError::invalid_input("The trainer id is invalid")
        })?;
        let page = query.parse()?;

        resources
            .database
            .trainers()
            .get(trainer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Trainer not found"))?;

        let (reviews, pagination) = resources
            .database
            .reviews()
            .list_for_trainer(trainer_id, page)
            .await?;

        Ok(respond(
            StatusCode::OK,
            "Reviews retrieved",
            ReviewsPage {
                reviews,
                pagination,
            },
        ))
    }

    /// Handle PUT /reviews/:review_id - author only
    #[tracing::instrument(skip(resources, headers, body), fields(route = "update_review"))]
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(review_id): Path<String>,
        body: Result<ApiJson<ReviewInput>, AppError>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        let ApiJson(input) = body?;
        let review_id = parse_review_id(&review_id)?;
        let reviews = resources.database.reviews();

        let review = reviews
            .get(review_id)
            .await?
            .ok_or_else(|| AppError::not_found("Review not found"))?;
        if review.client_id != auth.user_id() {
            return Err(AppError::forbidden("You can only edit your own reviews"));
        }

        let input = validated_input(input)?;
        let updated = reviews.update(review_id, &input).await?;
        info!(review_id, "Review updated");

        Ok(respond(StatusCode::OK, "Review updated", updated))
    }

    /// Handle DELETE /reviews/:review_id - author or admin
    #[tracing::instrument(skip(resources, headers), fields(route = "delete_review"))]
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(review_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        let review_id = parse_review_id(&review_id)?;
        let reviews = resources.database.reviews();

        let review = reviews
            .get(review_id)
            .await?
            .ok_or_else(|| AppError::not_found("Review not found"))?;
        if review.client_id != auth.user_id() && !auth.user.is_admin() {
            return Err(AppError::forbidden("You can only delete your own reviews"));
        }

        reviews.delete(review_id).await?;
        info!(review_id, by_admin = auth.user.is_admin(), "Review deleted");

        Ok(respond_message(StatusCode::OK, "Review deleted"))
    }
}
