// ABOUTME: Specialization catalog routes
// ABOUTME: POST /specializations creates a tag, GET lists the active ones by name
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tracing::info;

use super::extract::ApiJson;
use super::respond;
use crate::constants::limits;
use crate::errors::{AppError, AppResult, FieldError};
use crate::models::NewSpecialization;
use crate::resources::ServerResources;
use crate::validation::check_http_url;

/// Trim the request and check name and icon URL
fn validated_specialization(request: NewSpecialization) -> AppResult<NewSpecialization> {
    let clean = |value: Option<String>| {
        value
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    };
    let request = NewSpecialization {
        name: request.name.trim().to_owned(),
        description: clean(request.description),
        icon_url: clean(request.icon_url),
        is_active: request.is_active,
    };

    let mut errors = Vec::new();
    let name_len = request.name.chars().count();
    if name_len == 0 || name_len > limits::SPECIALIZATION_NAME_MAX_CHARS {
        errors.push(FieldError::new(
            "name",
            format!(
                "Name must be between 1 and {} characters",
                limits::SPECIALIZATION_NAME_MAX_CHARS
            ),
        ));
    }
    if let Some(icon_url) = &request.icon_url {
        check_http_url(&mut errors, "iconUrl", icon_url, limits::URL_MAX_CHARS);
    }

    if errors.is_empty() {
        Ok(request)
    } else {
        Err(AppError::validation(errors))
    }
}

/// Specialization routes handler
pub struct SpecializationRoutes;

impl SpecializationRoutes {
    /// Create specialization routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/specializations",
                get(Self::handle_list).post(Self::handle_create),
            )
            .with_state(resources)
    }

    /// Handle POST /specializations
    #[tracing::instrument(skip(resources, headers, body), fields(route = "create_specialization"))]
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<ApiJson<NewSpecialization>, AppError>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        let ApiJson(request) = body?;
        let request = validated_specialization(request)?;

        let specialization = resources
            .database
            .specializations()
            .create(&request)
            .await?;
        info!(
            specialization_id = specialization.id,
            user_id = auth.user_id(),
            "Specialization created"
        );

        Ok(respond(
            StatusCode::CREATED,
            "Specialization created successfully",
            specialization,
        ))
    }

    /// Handle GET /specializations - public
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let specializations = resources.database.specializations().list_active().await?;
        Ok(respond(
            StatusCode::OK,
            "Specializations retrieved",
            specializations,
        ))
    }
}
