// ABOUTME: Routes linking trainer profiles to specializations
// ABOUTME: Add links in bulk, list all links, remove one link from the caller's profile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::{delete, get};
use axum::Router;
use serde::Deserialize;
use tracing::{info, warn};

use super::extract::ApiJson;
use super::{parse_id, respond, respond_message};
use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use crate::middleware::AuthenticatedUser;
use crate::models::{NewTrainerSpecialization, TrainerProfile};
use crate::resources::ServerResources;
use crate::validation::check_max_length;

/// Body of POST /trainer-specializations
#[derive(Debug, Clone, Deserialize)]
pub struct AddSpecializationsRequest {
    /// Links to add
    pub specializations: Vec<NewTrainerSpecialization>,
}

/// Trim certifications, drop repeated ids and check lengths
fn validated_links(
    links: Vec<NewTrainerSpecialization>,
) -> AppResult<Vec<NewTrainerSpecialization>> {
    if links.is_empty() {
        return Err(AppError::invalid_input(
            "Specializations must be a non-empty array",
        ));
    }

    let mut seen = HashSet::new();
    let mut errors = Vec::new();
    let mut cleaned = Vec::with_capacity(links.len());
    for link in links {
        if !seen.insert(link.specialization_id) {
            continue;
        }
        let certification = link
            .certification
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty());
        if let Some(certification) = &certification {
            check_max_length(
                &mut errors,
                "certification",
                certification,
                limits::CERTIFICATION_MAX_CHARS,
            );
        }
        cleaned.push(NewTrainerSpecialization {
            certification,
            ..link
        });
    }

    if errors.is_empty() {
        Ok(cleaned)
    } else {
        Err(AppError::validation(errors))
    }
}

/// Trainer specialization routes handler
pub struct TrainerSpecializationRoutes;

impl TrainerSpecializationRoutes {
    /// Create trainer specialization routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/trainer-specializations",
                get(Self::handle_list).post(Self::handle_add),
            )
            .route(
                "/trainer-specializations/:specialization_id",
                delete(Self::handle_remove),
            )
            .with_state(resources)
    }

    /// The caller's trainer profile, 403 without one
    async fn caller_profile(
        auth: &AuthenticatedUser,
        resources: &Arc<ServerResources>,
    ) -> Result<TrainerProfile, AppError> {
        resources
            .database
            .trainers()
            .get_by_user(auth.user_id())
            .await?
            .ok_or_else(|| AppError::forbidden("Trainer doesnt exist for this user"))
    }

    /// Handle POST /trainer-specializations
    #[tracing::instrument(skip(resources, headers, body), fields(route = "add_specializations"))]
    async fn handle_add(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<ApiJson<AddSpecializationsRequest>, AppError>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        let ApiJson(request) = body?;
        let profile = Self::caller_profile(&auth, &resources).await?;
        let links = validated_links(request.specializations)?;

        let specializations = resources.database.specializations();
        let ids: Vec<i64> = links.iter().map(|l| l.specialization_id).collect();
        let unusable = specializations.unusable_ids(&ids).await?;
        if !unusable.is_empty() {
            warn!(?unusable, trainer_id = profile.id, "Unknown or inactive specializations");
            return Err(AppError::invalid_input(
                "One or more specializations are invalid",
            ));
        }

        let added = specializations.add_links(profile.id, &links).await?;
        if added.is_empty() {
            return Err(AppError::already_exists(
                "All of these specializations are already linked",
            ));
        }
        info!(trainer_id = profile.id, added = added.len(), "Specializations linked");

        Ok(respond(
            StatusCode::CREATED,
            "Specializations added successfully",
            added,
        ))
    }

    /// Handle GET /trainer-specializations
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        resources.auth_middleware.authenticate_headers(&headers).await?;
        let entries = resources.database.specializations().list_links().await?;
        Ok(respond(
            StatusCode::OK,
            "Trainer specializations retrieved",
            entries,
        ))
    }

    /// Handle DELETE /trainer-specializations/:specialization_id
    #[tracing::instrument(skip(resources, headers), fields(route = "remove_specialization"))]
    async fn handle_remove(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(specialization_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        let specialization_id = parse_id(&specialization_id, || {
            AppError::invalid_input("The specialization id is invalid")
        })?;
        let profile = Self::caller_profile(&auth, &resources).await?;

        let removed = resources
            .database
            .specializations()
            .remove_link(profile.id, specialization_id)
            .await?;
        if !removed {
            return Err(AppError::not_found("Specialization link not found"));
        }
        info!(trainer_id = profile.id, specialization_id, "Specialization unlinked");

        Ok(respond_message(StatusCode::OK, "Specialization removed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExperienceLevel;

    fn link(id: i64, certification: Option<&str>) -> NewTrainerSpecialization {
        NewTrainerSpecialization {
            specialization_id: id,
            experience_level: ExperienceLevel::Expert,
            certification: certification.map(str::to_owned),
        }
    }

    #[test]
    fn empty_list_is_rejected() {
        let err = validated_links(Vec::new()).unwrap_err();
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn repeated_ids_keep_the_first_entry() {
        let links =
            validated_links(vec![link(2, Some(" ACE ")), link(2, None), link(5, Some(""))])
                .unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].certification.as_deref(), Some("ACE"));
        assert_eq!(links[1].certification, None);
    }

    #[test]
    fn long_certifications_are_rejected() {
        let long = "c".repeat(limits::CERTIFICATION_MAX_CHARS + 1);
        let err = validated_links(vec![link(1, Some(&long))]).unwrap_err();
        assert_eq!(err.details[0].field, "certification");
    }
}
