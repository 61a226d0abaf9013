// ABOUTME: Integration tests for the email verification flow
// ABOUTME: Verify links from recorded mail, resend behaviour and verification status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use chrono::{Duration, Utc};
use common::{create_test_context, create_test_user, TestContext};
use helpers::axum_test::AxumTestRequest;
use serde_json::json;
use trainee_api::email::{generate_verification_token, hash_token};
use trainee_api::models::UserRole;

const GENERIC_RESEND: &str =
    "If an account with this email exists, a verification email has been sent";

/// Register through the API so a verification mail is recorded
async fn register(ctx: &TestContext, email: &str) -> String {
    let response = AxumTestRequest::post("/auth/register")
        .json(&json!({
            "email": email,
            "password": "Secret123",
            "firstName": "Mihai",
            "lastName": "Ionescu"
        }))
        .send(ctx.router())
        .await;
    assert_eq!(response.status(), 201);
    response.data()["token"].as_str().unwrap().to_owned()
}

fn verify_uri(token: &str, email: &str) -> String {
    format!("/email/verify?token={token}&email={email}")
}

#[tokio::test]
async fn test_verify_with_emailed_token() {
    let ctx = create_test_context().await.unwrap();
    register(&ctx, "mihai@example.com").await;
    let token = ctx
        .mailer
        .last_verification_token("mihai@example.com")
        .unwrap();

    let response = AxumTestRequest::get(&verify_uri(&token, "mihai@example.com"))
        .send(ctx.router())
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.message(), "Email verified successfully");
    assert_eq!(response.data()["isVerified"], true);
    assert!(!response.data()["emailVerifiedAt"].is_null());

    let stored = ctx
        .database()
        .get_user_by_email("mihai@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.is_verified);
    assert!(stored.email_verification_token_hash.is_none());

    let confirmation = ctx.mailer.messages_to("mihai@example.com");
    assert_eq!(confirmation.len(), 2);
    assert_eq!(confirmation[1].subject, "Your email address is verified");
}

#[tokio::test]
async fn test_verify_twice_reports_already_verified() {
    let ctx = create_test_context().await.unwrap();
    register(&ctx, "mihai@example.com").await;
    let token = ctx
        .mailer
        .last_verification_token("mihai@example.com")
        .unwrap();
    let uri = verify_uri(&token, "mihai@example.com");

    let first = AxumTestRequest::get(&uri).send(ctx.router()).await;
    assert_eq!(first.status(), 200);

    let second = AxumTestRequest::get(&uri).send(ctx.router()).await;
    assert_eq!(second.status(), 400);
    assert_eq!(second.message(), "Email is already verified");
}

#[tokio::test]
async fn test_verify_requires_token_and_email() {
    let ctx = create_test_context().await.unwrap();

    for uri in [
        "/email/verify",
        "/email/verify?token=abc",
        "/email/verify?email=mihai@example.com",
        "/email/verify?token=&email=mihai@example.com",
    ] {
        let response = AxumTestRequest::get(uri).send(ctx.router()).await;
        assert_eq!(response.status(), 400, "{uri}");
        assert_eq!(response.message(), "Token and email are required");
    }
}

#[tokio::test]
async fn test_verify_unknown_email_is_not_found() {
    let ctx = create_test_context().await.unwrap();

    let response = AxumTestRequest::get(&verify_uri("abc", "ghost@example.com"))
        .send(ctx.router())
        .await;

    assert_eq!(response.status(), 404);
    assert_eq!(response.message(), "User not found");
}

#[tokio::test]
async fn test_verify_rejects_wrong_token() {
    let ctx = create_test_context().await.unwrap();
    register(&ctx, "mihai@example.com").await;

    let response = AxumTestRequest::get(&verify_uri("deadbeef", "mihai@example.com"))
        .send(ctx.router())
        .await;

    assert_eq!(response.status(), 400);
    assert_eq!(response.message(), "Invalid or expired token");
}

#[tokio::test]
async fn test_verify_rejects_expired_token() {
    let ctx = create_test_context().await.unwrap();
    let (user, _) = create_test_user(&ctx, "mihai@example.com", UserRole::Client)
        .await
        .unwrap();
    let (raw, hash) = generate_verification_token();
    ctx.database()
        .store_email_verification_token(user.id, &hash, Utc::now() - Duration::minutes(1))
        .await
        .unwrap();

    let response = AxumTestRequest::get(&verify_uri(&raw, "mihai@example.com"))
        .send(ctx.router())
        .await;

    assert_eq!(response.status(), 400);
    assert_eq!(response.message(), "Invalid or expired token");
    assert_eq!(hash_token(&raw), hash);
}

#[tokio::test]
async fn test_resend_replaces_the_previous_token() {
    let ctx = create_test_context().await.unwrap();
    register(&ctx, "mihai@example.com").await;
    let first = ctx
        .mailer
        .last_verification_token("mihai@example.com")
        .unwrap();

    let response = AxumTestRequest::post("/email/resend")
        .json(&json!({ "email": "Mihai@Example.com" }))
        .send(ctx.router())
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.message(), GENERIC_RESEND);

    let second = ctx
        .mailer
        .last_verification_token("mihai@example.com")
        .unwrap();
    assert_ne!(first, second);

    let stale = AxumTestRequest::get(&verify_uri(&first, "mihai@example.com"))
        .send(ctx.router())
        .await;
    assert_eq!(stale.status(), 400);

    let fresh = AxumTestRequest::get(&verify_uri(&second, "mihai@example.com"))
        .send(ctx.router())
        .await;
    assert_eq!(fresh.status(), 200);
}

#[tokio::test]
async fn test_resend_for_unknown_email_does_not_reveal_accounts() {
    let ctx = create_test_context().await.unwrap();

    let response = AxumTestRequest::post("/email/resend")
        .json(&json!({ "email": "ghost@example.com" }))
        .send(ctx.router())
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.message(), GENERIC_RESEND);
    assert!(ctx.mailer.messages().is_empty());
}

#[tokio::test]
async fn test_resend_for_verified_user_is_rejected() {
    let ctx = create_test_context().await.unwrap();
    let (user, _) = create_test_user(&ctx, "mihai@example.com", UserRole::Client)
        .await
        .unwrap();
    ctx.database().mark_email_verified(user.id).await.unwrap();

    let response = AxumTestRequest::post("/email/resend")
        .json(&json!({ "email": "mihai@example.com" }))
        .send(ctx.router())
        .await;

    assert_eq!(response.status(), 400);
    assert_eq!(response.message(), "Email is already verified");
}

#[tokio::test]
async fn test_status_follows_verification() {
    let ctx = create_test_context().await.unwrap();
    let token = register(&ctx, "mihai@example.com").await;

    let before = AxumTestRequest::get("/email/status")
        .bearer(&token)
        .send(ctx.router())
        .await;
    assert_eq!(before.status(), 200);
    assert_eq!(before.data()["isVerified"], false);
    assert!(before.data()["emailVerifiedAt"].is_null());

    let raw = ctx
        .mailer
        .last_verification_token("mihai@example.com")
        .unwrap();
    AxumTestRequest::get(&verify_uri(&raw, "mihai@example.com"))
        .send(ctx.router())
        .await;

    let after = AxumTestRequest::get("/email/status")
        .bearer(&token)
        .send(ctx.router())
        .await;
    assert_eq!(after.data()["isVerified"], true);
    assert_eq!(after.data()["email"], "mihai@example.com");
}

#[tokio::test]
async fn test_status_requires_authentication() {
    let ctx = create_test_context().await.unwrap();

    let response = AxumTestRequest::get("/email/status")
        .send(ctx.router())
        .await;

    assert_eq!(response.status(), 401);
}
