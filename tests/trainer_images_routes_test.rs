// ABOUTME: Integration tests for profile picture and trainer gallery uploads
// ABOUTME: Multipart bodies stored in the in-memory image store, with ownership and size checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use common::{create_test_context, create_test_trainer, create_test_user, trainer_fields};
use helpers::axum_test::{AxumTestRequest, MultipartForm};
use trainee_api::models::UserRole;
use trainee_api::storage::ImageStore;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

fn gallery(count: usize) -> MultipartForm {
    (0..count).fold(MultipartForm::new(), |form, index| {
        form.file("images", &format!("photo-{index}.png"), "image/png", PNG)
    })
}

#[tokio::test]
async fn test_upload_profile_picture() {
    let ctx = create_test_context().await.unwrap();
    let (user, token) = create_test_user(&ctx, "ana@example.com", UserRole::Client)
        .await
        .unwrap();

    let response = AxumTestRequest::post("/trainer-images/profile-picture")
        .bearer(&token)
        .multipart(
            MultipartForm::new()
                .text("caption", "ignored")
                .file("profileImage", "me.png", "image/png", PNG),
        )
        .send(ctx.router())
        .await;

    assert_eq!(response.status(), 200);
    let data = response.data();
    let key = data["s3Key"].as_str().unwrap();
    let url = data["imageUrl"].as_str().unwrap();
    assert!(key.starts_with(&format!("profilePicture/{}/", user.id)));
    assert!(key.ends_with(".png"));
    assert_eq!(
        url,
        format!("https://trainee-test.s3.eu-central-1.amazonaws.com/{key}")
    );
    assert_eq!(data["user"]["profileImageUrl"], url);

    let object = ctx.store.get(key).unwrap();
    assert_eq!(object.bytes.as_ref(), PNG);
    assert_eq!(object.content_type, "image/png");
}

#[tokio::test]
async fn test_replacing_profile_picture_deletes_the_old_object() {
    let ctx = create_test_context().await.unwrap();
    let (_, token) = create_test_user(&ctx, "ana@example.com", UserRole::Client)
        .await
        .unwrap();
    let upload = || {
        AxumTestRequest::post("/trainer-images/profile-picture")
            .bearer(&token)
            .multipart(MultipartForm::new().file("profileImage", "me.jpg", "image/jpeg", PNG))
    };

    let first = upload().send(ctx.router()).await;
    let first_key = first.data()["s3Key"].as_str().unwrap().to_owned();
    let second = upload().send(ctx.router()).await;
    let second_key = second.data()["s3Key"].as_str().unwrap().to_owned();

    assert_ne!(first_key, second_key);
    assert!(!ctx.store.exists(&first_key).await.unwrap());
    assert!(ctx.store.exists(&second_key).await.unwrap());
    assert_eq!(ctx.store.len(), 1);
}

#[tokio::test]
async fn test_profile_picture_rejects_non_images_and_missing_files() {
    let ctx = create_test_context().await.unwrap();
    let (_, token) = create_test_user(&ctx, "ana@example.com", UserRole::Client)
        .await
        .unwrap();

    let pdf = AxumTestRequest::post("/trainer-images/profile-picture")
        .bearer(&token)
        .multipart(MultipartForm::new().file(
            "profileImage",
            "cv.pdf",
            "application/pdf",
            b"%PDF-1.7",
        ))
        .send(ctx.router())
        .await;
    assert_eq!(pdf.status(), 415);

    let wrong_field = AxumTestRequest::post("/trainer-images/profile-picture")
        .bearer(&token)
        .multipart(MultipartForm::new().file("avatar", "me.png", "image/png", PNG))
        .send(ctx.router())
        .await;
    assert_eq!(wrong_field.status(), 400);
    assert_eq!(wrong_field.message(), "No file uploaded");

    assert!(ctx.store.is_empty());
}

#[tokio::test]
async fn test_profile_picture_size_limit() {
    let ctx = create_test_context().await.unwrap();
    let (_, token) = create_test_user(&ctx, "ana@example.com", UserRole::Client)
        .await
        .unwrap();
    let oversized = vec![0_u8; 5 * 1024 * 1024 + 1];

    let response = AxumTestRequest::post("/trainer-images/profile-picture")
        .bearer(&token)
        .multipart(MultipartForm::new().file("profileImage", "big.png", "image/png", &oversized))
        .send(ctx.router())
        .await;

    assert_eq!(response.status(), 413);
    assert!(ctx.store.is_empty());
}

#[tokio::test]
async fn test_delete_profile_picture() {
    let ctx = create_test_context().await.unwrap();
    let (user, token) = create_test_user(&ctx, "ana@example.com", UserRole::Client)
        .await
        .unwrap();
    AxumTestRequest::post("/trainer-images/profile-picture")
        .bearer(&token)
        .multipart(MultipartForm::new().file("profileImage", "me.png", "image/png", PNG))
        .send(ctx.router())
        .await;

    let response = AxumTestRequest::delete("/trainer-images/profile-picture")
        .bearer(&token)
        .send(ctx.router())
        .await;

    assert_eq!(response.status(), 200);
    assert!(response.data()["profileImageUrl"].is_null());
    assert!(ctx.store.is_empty());
    let stored = ctx.database().get_user_required(user.id).await.unwrap();
    assert!(stored.profile_image_url.is_none());

    let again = AxumTestRequest::delete("/trainer-images/profile-picture")
        .bearer(&token)
        .send(ctx.router())
        .await;
    assert_eq!(again.status(), 404);
    assert_eq!(again.message(), "No profile picture to delete");
}

#[tokio::test]
async fn test_upload_gallery_orders_images_and_picks_primary() {
    let ctx = create_test_context().await.unwrap();
    let (_, token, profile) =
        create_test_trainer(&ctx, "coach@example.com", trainer_fields("Sibiu", 50.0))
            .await
            .unwrap();

    let first = AxumTestRequest::post("/trainer-images")
        .bearer(&token)
        .multipart(gallery(2))
        .send(ctx.router())
        .await;
    assert_eq!(first.status(), 201);
    let batch = first.data();
    assert_eq!(batch[0]["isPrimary"], true);
    assert_eq!(batch[0]["displayOrder"], 0);
    assert_eq!(batch[1]["isPrimary"], false);
    assert_eq!(batch[1]["displayOrder"], 1);

    let second = AxumTestRequest::post("/trainer-images")
        .bearer(&token)
        .multipart(gallery(1))
        .send(ctx.router())
        .await;
    assert_eq!(second.data()[0]["isPrimary"], false);
    assert_eq!(second.data()[0]["displayOrder"], 2);

    let images = ctx
        .database()
        .images()
        .list_for_trainer(profile.id)
        .await
        .unwrap();
    assert_eq!(images.len(), 3);
    assert_eq!(images.iter().filter(|i| i.is_primary).count(), 1);
    assert_eq!(ctx.store.len(), 3);

    let details = AxumTestRequest::get("/trainer")
        .bearer(&token)
        .send(ctx.router())
        .await;
    assert_eq!(details.data()["images"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_upload_gallery_limits() {
    let ctx = create_test_context().await.unwrap();
    let (_, token, _) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Sibiu", 50.0))
        .await
        .unwrap();

    let too_many = AxumTestRequest::post("/trainer-images")
        .bearer(&token)
        .multipart(gallery(6))
        .send(ctx.router())
        .await;
    assert_eq!(too_many.status(), 400);

    let none = AxumTestRequest::post("/trainer-images")
        .bearer(&token)
        .multipart(MultipartForm::new().text("images", "not a file"))
        .send(ctx.router())
        .await;
    assert_eq!(none.status(), 415);

    assert!(ctx.store.is_empty());
}

#[tokio::test]
async fn test_upload_gallery_requires_trainer_profile() {
    let ctx = create_test_context().await.unwrap();
    let (_, token) = create_test_user(&ctx, "client@example.com", UserRole::Client)
        .await
        .unwrap();

    let response = AxumTestRequest::post("/trainer-images")
        .bearer(&token)
        .multipart(gallery(1))
        .send(ctx.router())
        .await;

    assert_eq!(response.status(), 403);
    assert_eq!(response.message(), "Trainer doesnt exist for this user");
}

#[tokio::test]
async fn test_delete_gallery_image_promotes_next_primary() {
    let ctx = create_test_context().await.unwrap();
    let (_, token, profile) =
        create_test_trainer(&ctx, "coach@example.com", trainer_fields("Sibiu", 50.0))
            .await
            .unwrap();
    let uploaded = AxumTestRequest::post("/trainer-images")
        .bearer(&token)
        .multipart(gallery(2))
        .send(ctx.router())
        .await;
    let primary_id = uploaded.data()[0]["id"].as_str().unwrap().to_owned();
    let next_id = uploaded.data()[1]["id"].as_str().unwrap().to_owned();

    let response = AxumTestRequest::delete(&format!("/trainer-images/{primary_id}"))
        .bearer(&token)
        .send(ctx.router())
        .await;

    assert_eq!(response.status(), 200);
    let images = ctx
        .database()
        .images()
        .list_for_trainer(profile.id)
        .await
        .unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].id.to_string(), next_id);
    assert!(images[0].is_primary);
    assert_eq!(ctx.store.len(), 1);
}

#[tokio::test]
async fn test_delete_gallery_image_ownership_and_errors() {
    let ctx = create_test_context().await.unwrap();
    let (_, owner, _) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Sibiu", 50.0))
        .await
        .unwrap();
    let (_, intruder, _) =
        create_test_trainer(&ctx, "rival@example.com", trainer_fields("Arad", 20.0))
            .await
            .unwrap();
    let uploaded = AxumTestRequest::post("/trainer-images")
        .bearer(&owner)
        .multipart(gallery(1))
        .send(ctx.router())
        .await;
    let image_id = uploaded.data()[0]["id"].as_str().unwrap().to_owned();

    let forbidden = AxumTestRequest::delete(&format!("/trainer-images/{image_id}"))
        .bearer(&intruder)
        .send(ctx.router())
        .await;
    assert_eq!(forbidden.status(), 403);
    assert_eq!(forbidden.message(), "You can only delete your own images");

    let bad_id = AxumTestRequest::delete("/trainer-images/not-a-uuid")
        .bearer(&owner)
        .send(ctx.router())
        .await;
    assert_eq!(bad_id.status(), 400);

    let unknown = AxumTestRequest::delete(&format!("/trainer-images/{}", uuid::Uuid::new_v4()))
        .bearer(&owner)
        .send(ctx.router())
        .await;
    assert_eq!(unknown.status(), 404);
    assert_eq!(unknown.message(), "Image not found");

    assert_eq!(ctx.store.len(), 1);
}
