// ABOUTME: Integration tests for trainer review routes
// ABOUTME: Review creation rules, listing with pagination, author-only edits and rating aggregates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use common::{create_test_context, create_test_trainer, create_test_user, trainer_fields};
use helpers::axum_test::AxumTestRequest;
use serde_json::json;
use trainee_api::models::{TrainerProfile, UserRole};

async fn post_review(
    ctx: &common::TestContext,
    token: &str,
    trainer_id: i64,
    body: &serde_json::Value,
) -> helpers::axum_test::AxumTestResponse {
    AxumTestRequest::post(&format!("/reviews/{trainer_id}"))
        .bearer(token)
        .json(body)
        .send(ctx.router())
        .await
}

async fn reload(ctx: &common::TestContext, trainer_id: i64) -> TrainerProfile {
    ctx.database()
        .trainers()
        .get_required(trainer_id)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_review_updates_trainer_rating() {
    let ctx = create_test_context().await.unwrap();
    let (_, _, trainer) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();
    let (client, token) = create_test_user(&ctx, "ioana@example.com", UserRole::Client)
        .await
        .unwrap();

    let response = post_review(
        &ctx,
        &token,
        trainer.id,
        &json!({ "rating": 4, "reviewText": "  Great sessions, very patient  " }),
    )
    .await;

    assert_eq!(response.status(), 201);
    assert_eq!(response.message(), "Review created");
    let data = response.data();
    assert_eq!(data["rating"], 4);
    assert_eq!(data["reviewText"], "Great sessions, very patient");
    assert_eq!(data["trainerId"], trainer.id);
    assert_eq!(data["clientId"], client.id);
    assert_eq!(data["client"]["firstName"], "Test");

    let profile = reload(&ctx, trainer.id).await;
    assert_eq!(profile.review_count, 1);
    assert!((profile.total_rating - 4.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_rating_is_the_rounded_average() {
    let ctx = create_test_context().await.unwrap();
    let (_, _, trainer) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();

    for (email, rating) in [
        ("a@example.com", 5),
        ("b@example.com", 4),
        ("c@example.com", 5),
    ] {
        let (_, token) = create_test_user(&ctx, email, UserRole::Client).await.unwrap();
        let response = post_review(&ctx, &token, trainer.id, &json!({ "rating": rating })).await;
        assert_eq!(response.status(), 201);
    }

    let profile = reload(&ctx, trainer.id).await;
    assert_eq!(profile.review_count, 3);
    assert!((profile.total_rating - 4.67).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_create_review_for_unknown_trainer() {
    let ctx = create_test_context().await.unwrap();
    let (_, token) = create_test_user(&ctx, "ioana@example.com", UserRole::Client)
        .await
        .unwrap();

    let unknown = post_review(&ctx, &token, 999, &json!({ "rating": 5 })).await;
    assert_eq!(unknown.status(), 400);
    assert_eq!(unknown.message(), "Trainer doesnt exist");

    let malformed = AxumTestRequest::post("/reviews/abc")
        .bearer(&token)
        .json(&json!({ "rating": 5 }))
        .send(ctx.router())
        .await;
    assert_eq!(malformed.status(), 400);
}

#[tokio::test]
async fn test_trainer_cannot_review_themselves() {
    let ctx = create_test_context().await.unwrap();
    let (_, token, trainer) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();

    let response = post_review(&ctx, &token, trainer.id, &json!({ "rating": 5 })).await;

    assert_eq!(response.status(), 400);
    assert_eq!(response.message(), "Trainers cannot review themselves");
    assert_eq!(reload(&ctx, trainer.id).await.review_count, 0);
}

#[tokio::test]
async fn test_second_review_by_same_client_is_rejected() {
    let ctx = create_test_context().await.unwrap();
    let (_, _, trainer) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();
    let (_, token) = create_test_user(&ctx, "ioana@example.com", UserRole::Client)
        .await
        .unwrap();

    assert_eq!(
        post_review(&ctx, &token, trainer.id, &json!({ "rating": 5 }))
            .await
            .status(),
        201
    );
    let again = post_review(&ctx, &token, trainer.id, &json!({ "rating": 1 })).await;

    assert_eq!(again.status(), 400);
    assert_eq!(again.message(), "You already left a review for this trainer");
    let profile = reload(&ctx, trainer.id).await;
    assert_eq!(profile.review_count, 1);
    assert!((profile.total_rating - 5.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_create_review_validates_rating_and_text() {
    let ctx = create_test_context().await.unwrap();
    let (_, _, trainer) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();
    let (_, token) = create_test_user(&ctx, "ioana@example.com", UserRole::Client)
        .await
        .unwrap();

    let response = post_review(
        &ctx,
        &token,
        trainer.id,
        &json!({ "rating": 6, "reviewText": "Meh" }),
    )
    .await;

    assert_eq!(response.status(), 400);
    assert_eq!(response.error_fields(), vec!["rating", "reviewText"]);
    assert_eq!(reload(&ctx, trainer.id).await.review_count, 0);
}

#[tokio::test]
async fn test_create_review_requires_authentication() {
    let ctx = create_test_context().await.unwrap();
    let (_, _, trainer) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();

    let response = AxumTestRequest::post(&format!("/reviews/{}", trainer.id))
        .json(&json!({ "rating": 5 }))
        .send(ctx.router())
        .await;

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_missing_token_is_reported_before_body_errors() {
    let ctx = create_test_context().await.unwrap();
    let (_, _, trainer) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();

    let empty_body = AxumTestRequest::post(&format!("/reviews/{}", trainer.id))
        .header("content-type", "application/json")
        .send(ctx.router())
        .await;
    assert_eq!(empty_body.status(), 401);
    assert_eq!(empty_body.message(), "User is not authenticated");

    let update = AxumTestRequest::put("/reviews/1")
        .send(ctx.router())
        .await;
    assert_eq!(update.status(), 401);
}

#[tokio::test]
async fn test_list_reviews_is_public_and_paginated() {
    let ctx = create_test_context().await.unwrap();
    let (_, _, trainer) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();
    for (index, email) in ["a@example.com", "b@example.com", "c@example.com"]
        .iter()
        .enumerate()
    {
        let (_, token) = create_test_user(&ctx, email, UserRole::Client).await.unwrap();
        let rating = i64::try_from(index).unwrap() + 3;
        post_review(&ctx, &token, trainer.id, &json!({ "rating": rating })).await;
    }

    let response = AxumTestRequest::get(&format!("/reviews/{}?limit=2", trainer.id))
        .send(ctx.router())
        .await;

    assert_eq!(response.status(), 200);
    let data = response.data();
    let ratings: Vec<i64> = data["reviews"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["rating"].as_i64().unwrap())
        .collect();
    assert_eq!(ratings, vec![5, 4]);
    assert_eq!(data["pagination"]["total"], 3);
    assert_eq!(data["pagination"]["totalPages"], 2);
    assert_eq!(data["pagination"]["hasNextPage"], true);

    let last = AxumTestRequest::get(&format!("/reviews/{}?limit=2&page=2", trainer.id))
        .send(ctx.router())
        .await;
    assert_eq!(last.data()["reviews"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_reviews_errors() {
    let ctx = create_test_context().await.unwrap();

    let unknown = AxumTestRequest::get("/reviews/404").send(ctx.router()).await;
    assert_eq!(unknown.status(), 404);
    assert_eq!(unknown.message(), "Trainer not found");

    let bad_page = AxumTestRequest::get("/reviews/1?page=zero")
        .send(ctx.router())
        .await;
    assert_eq!(bad_page.status(), 400);
    assert_eq!(bad_page.error_fields(), vec!["page"]);
}

#[tokio::test]
async fn test_author_updates_review_and_rating_follows() {
    let ctx = create_test_context().await.unwrap();
    let (_, _, trainer) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();
    let (_, token) = create_test_user(&ctx, "ioana@example.com", UserRole::Client)
        .await
        .unwrap();
    let created = post_review(&ctx, &token, trainer.id, &json!({ "rating": 2 })).await;
    let review_id = created.data()["id"].as_i64().unwrap();

    let response = AxumTestRequest::put(&format!("/reviews/{review_id}"))
        .bearer(&token)
        .json(&json!({ "rating": 5, "reviewText": "Changed my mind, excellent" }))
        .send(ctx.router())
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.data()["rating"], 5);
    assert_eq!(response.data()["reviewText"], "Changed my mind, excellent");
    let profile = reload(&ctx, trainer.id).await;
    assert_eq!(profile.review_count, 1);
    assert!((profile.total_rating - 5.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_only_author_may_update_review() {
    let ctx = create_test_context().await.unwrap();
    let (_, _, trainer) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();
    let (_, author) = create_test_user(&ctx, "ioana@example.com", UserRole::Client)
        .await
        .unwrap();
    let (_, other) = create_test_user(&ctx, "other@example.com", UserRole::Client)
        .await
        .unwrap();
    let created = post_review(&ctx, &author, trainer.id, &json!({ "rating": 2 })).await;
    let review_id = created.data()["id"].as_i64().unwrap();

    let forbidden = AxumTestRequest::put(&format!("/reviews/{review_id}"))
        .bearer(&other)
        .json(&json!({ "rating": 5 }))
        .send(ctx.router())
        .await;
    assert_eq!(forbidden.status(), 403);
    assert_eq!(forbidden.message(), "You can only edit your own reviews");

    let missing = AxumTestRequest::put("/reviews/9999")
        .bearer(&author)
        .json(&json!({ "rating": 5 }))
        .send(ctx.router())
        .await;
    assert_eq!(missing.status(), 404);
    assert_eq!(missing.message(), "Review not found");
}

#[tokio::test]
async fn test_delete_review_by_author_resets_rating() {
    let ctx = create_test_context().await.unwrap();
    let (_, _, trainer) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();
    let (_, token) = create_test_user(&ctx, "ioana@example.com", UserRole::Client)
        .await
        .unwrap();
    let created = post_review(&ctx, &token, trainer.id, &json!({ "rating": 3 })).await;
    let review_id = created.data()["id"].as_i64().unwrap();

    let response = AxumTestRequest::delete(&format!("/reviews/{review_id}"))
        .bearer(&token)
        .send(ctx.router())
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.message(), "Review deleted");
    let profile = reload(&ctx, trainer.id).await;
    assert_eq!(profile.review_count, 0);
    assert!(profile.total_rating.abs() < f64::EPSILON);

    let again = AxumTestRequest::delete(&format!("/reviews/{review_id}"))
        .bearer(&token)
        .send(ctx.router())
        .await;
    assert_eq!(again.status(), 404);
}

#[tokio::test]
async fn test_admin_may_delete_any_review() {
    let ctx = create_test_context().await.unwrap();
    let (_, _, trainer) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();
    let (_, author) = create_test_user(&ctx, "ioana@example.com", UserRole::Client)
        .await
        .unwrap();
    let (_, other) = create_test_user(&ctx, "other@example.com", UserRole::Client)
        .await
        .unwrap();
    let (_, admin) = create_test_user(&ctx, "admin@example.com", UserRole::Admin)
        .await
        .unwrap();
    let created = post_review(&ctx, &author, trainer.id, &json!({ "rating": 1 })).await;
    let uri = format!("/reviews/{}", created.data()["id"].as_i64().unwrap());

    let forbidden = AxumTestRequest::delete(&uri)
        .bearer(&other)
        .send(ctx.router())
        .await;
    assert_eq!(forbidden.status(), 403);

    let by_admin = AxumTestRequest::delete(&uri)
        .bearer(&admin)
        .send(ctx.router())
        .await;
    assert_eq!(by_admin.status(), 200);
    assert_eq!(reload(&ctx, trainer.id).await.review_count, 0);
}
