// ABOUTME: Image upload routes for profile pictures and trainer galleries
// ABOUTME: Multipart uploads are validated, stored through the ImageStore and recorded in the database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Image routes
//!
//! Objects are written to the store before the database is touched. When the
//! database write fails the fresh objects are removed again; when an old
//! object cannot be removed the failure is only logged.

use std::sync::Arc;

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::{delete, post};
use axum::Router;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::{respond, respond_message};
use crate::constants::{form_fields, limits, storage_keys};
use crate::database::NewTrainerImage;
use crate::errors::{AppError, AppResult};
use crate::models::{TrainerImage, User};
use crate::resources::ServerResources;
use crate::storage::{object_key, validate_image, ImageStore, UploadedImage};

/// Response of a profile picture upload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePictureResponse {
    /// Updated user
    pub user: User,
    /// Object key in the bucket
    pub s3_key: String,
    /// Public URL
    pub image_url: String,
}

fn multipart_error(error: &MultipartError) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large("Upload exceeds the request size limit")
    } else {
        AppError::invalid_input(format!("Invalid multipart body: {}", error.body_text()))
    }
}

/// Collect up to `max_files` files sent under `field_name`, ignoring other fields
async fn read_files(
    multipart: &mut Multipart,
    field_name: &str,
    max_files: usize,
) -> AppResult<Vec<UploadedImage>> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e))?
    {
        if field.name() != Some(field_name) {
            continue;
        }
        if files.len() == max_files {
            return Err(AppError::invalid_input(format!(
                "At most {max_files} files may be uploaded at once"
            )));
        }
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = field.bytes().await.map_err(|e| multipart_error(&e))?;
        files.push(UploadedImage {
            file_name,
            content_type,
            bytes,
        });
    }

    if files.is_empty() {
        return Err(AppError::invalid_input("No file uploaded"));
    }
    Ok(files)
}

/// Delete the object behind `url` if it lives in `store`, logging failures
async fn delete_quietly(store: &dyn ImageStore, url: &str) {
    let Some(key) = store.key_from_url(url) else {
        return;
    };
    if let Err(e) = store.delete(&key).await {
        warn!(key, error = %e, "Failed to delete stored image");
    }
}

/// Image routes handler
pub struct ImageRoutes;

impl ImageRoutes {
    /// Create image routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/trainer-images/profile-picture",
                post(Self::handle_upload_profile_picture)
                    .delete(Self::handle_delete_profile_picture),
            )
            .route("/trainer-images", post(Self::handle_upload_gallery))
            .route("/trainer-images/:image_id", delete(Self::handle_delete_image))
            .with_state(resources)
    }

    /// Handle POST /trainer-images/profile-picture
    #[tracing::instrument(skip(resources, headers, multipart), fields(route = "upload_profile_picture"))]
    async fn handle_upload_profile_picture(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        let mut multipart = multipart.map_err(|e| AppError::invalid_input(e.body_text()))?;

        let files = read_files(&mut multipart, form_fields::PROFILE_IMAGE, 1).await?;
        let Some(upload) = files.into_iter().next() else {
            return Err(AppError::invalid_input("No file uploaded"));
        };
        validate_image(&upload, limits::PROFILE_PICTURE_MAX_BYTES)?;

        let key = object_key(storage_keys::PROFILE_PICTURE_FOLDER, auth.user_id(), &upload);
        let stored = resources
            .image_store
            .put(&key, upload.bytes, &upload.content_type)
            .await?;

        let user = match resources
            .database
            .set_profile_image_url(auth.user_id(), Some(&stored.url))
            .await
        {
            Ok(user) => user,
            Err(e) => {
                delete_quietly(resources.image_store.as_ref(), &stored.url).await;
                return Err(e);
            }
        };

        if let Some(previous) = auth.user.profile_image_url.as_deref() {
            delete_quietly(resources.image_store.as_ref(), previous).await;
        }
        info!(user_id = user.id, key = %stored.key, size = stored.size, "Profile picture uploaded");

        Ok(respond(
            StatusCode::OK,
            "Profile picture uploaded successfully",
            ProfilePictureResponse {
                user,
                s3_key: stored.key,
                image_url: stored.url,
            },
        ))
    }

    /// Handle DELETE /trainer-images/profile-picture
    #[tracing::instrument(skip(resources, headers), fields(route = "delete_profile_picture"))]
    async fn handle_delete_profile_picture(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        let Some(url) = auth.user.profile_image_url.as_deref() else {
            return Err(AppError::not_found("No profile picture to delete"));
        };

        if let Some(key) = resources.image_store.key_from_url(url) {
            resources.image_store.delete(&key).await?;
        }
        let user = resources
            .database
            .set_profile_image_url(auth.user_id(), None)
            .await?;
        info!(user_id = user.id, "Profile picture deleted");

        Ok(respond(StatusCode::OK, "Profile picture deleted", user))
    }

    /// Handle POST /trainer-images - gallery upload
    #[tracing::instrument(skip(resources, headers, multipart), fields(route = "upload_trainer_images"))]
    async fn handle_upload_gallery(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        let profile = resources
            .database
            .trainers()
            .get_by_user(auth.user_id())
            .await?
            .ok_or_else(|| AppError::forbidden("Trainer doesnt exist for this user"))?;
        let mut multipart = multipart.map_err(|e| AppError::invalid_input(e.body_text()))?;

        let uploads = read_files(
            &mut multipart,
            form_fields::TRAINER_IMAGES,
            limits::TRAINER_IMAGES_PER_REQUEST,
        )
        .await?;
        for upload in &uploads {
            validate_image(upload, limits::TRAINER_IMAGE_MAX_BYTES)?;
        }

        let mut stored = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let key = object_key(storage_keys::TRAINER_IMAGES_FOLDER, auth.user_id(), &upload);
            match resources
                .image_store
                .put(&key, upload.bytes, &upload.content_type)
                .await
            {
                Ok(object) => stored.push(object),
                Err(e) => {
                    for object in &stored {
                        delete_quietly(resources.image_store.as_ref(), &object.url).await;
                    }
                    return Err(e);
                }
            }
        }

        let rows: Vec<NewTrainerImage> = stored
            .iter()
            .map(|object| NewTrainerImage {
                image_url: object.url.clone(),
                alt_text: None,
            })
            .collect();
        let images: Vec<TrainerImage> =
            match resources.database.images().append(profile.id, &rows).await {
                Ok(images) => images,
                Err(e) => {
                    for object in &stored {
                        delete_quietly(resources.image_store.as_ref(), &object.url).await;
                    }
                    return Err(e);
                }
            };
        info!(trainer_id = profile.id, count = images.len(), "Trainer images uploaded");

        Ok(respond(
            StatusCode::CREATED,
            "Images uploaded successfully",
            images,
        ))
    }

    /// Handle DELETE /trainer-images/:image_id - owner only
    #[tracing::instrument(skip(resources, headers), fields(route = "delete_trainer_image"))]
    async fn handle_delete_image(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(image_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        let image_id = Uuid::parse_str(image_id.trim())
            .map_err(|_| AppError::invalid_input("The image id is invalid"))?;

        let images = resources.database.images();
        let image = images
            .get(image_id)
            .await?
            .ok_or_else(|| AppError::not_found("Image not found"))?;

        let owns_image = resources
            .database
            .trainers()
            .get_by_user(auth.user_id())
            .await?
            .is_some_and(|profile| profile.id == image.trainer_id);
        if !owns_image {
            return Err(AppError::forbidden("You can only delete your own images"));
        }

        images.delete(&image).await?;
        delete_quietly(resources.image_store.as_ref(), &image.image_url).await;
        info!(%image_id, trainer_id = image.trainer_id, "Trainer image deleted");

        Ok(respond_message(StatusCode::OK, "Image deleted"))
    }
}
