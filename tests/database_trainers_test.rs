// ABOUTME: Database-level tests for trainer profiles, reviews and gallery images
// ABOUTME: Rating aggregation, cascading deletes and primary image bookkeeping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{
    create_test_context, create_test_specialization, create_test_trainer, create_test_user,
    trainer_fields,
};
use tempfile::TempDir;
use trainee_api::config::DatabaseConfig;
use trainee_api::database::{Database, NewTrainerImage};
use trainee_api::models::{NewSpecialization, ReviewInput, UserRole};

fn rating(value: i64) -> ReviewInput {
    ReviewInput {
        rating: value,
        review_text: None,
    }
}

fn image(url: &str) -> NewTrainerImage {
    NewTrainerImage {
        image_url: url.to_owned(),
        alt_text: None,
    }
}

#[tokio::test]
async fn test_rating_aggregate_follows_every_review_change() {
    let ctx = create_test_context().await.unwrap();
    let db = ctx.database();
    let (_, _, profile) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();
    let (first, _) = create_test_user(&ctx, "first@example.com", UserRole::Client)
        .await
        .unwrap();
    let (second, _) = create_test_user(&ctx, "second@example.com", UserRole::Client)
        .await
        .unwrap();

    let kept = db.reviews().create(profile.id, first.id, &rating(4)).await.unwrap();
    let changed = db.reviews().create(profile.id, second.id, &rating(5)).await.unwrap();
    let stored = db.trainers().get_required(profile.id).await.unwrap();
    assert_eq!(stored.review_count, 2);
    assert!((stored.total_rating - 4.5).abs() < f64::EPSILON);

    db.reviews().update(changed.review.id, &rating(1)).await.unwrap();
    let stored = db.trainers().get_required(profile.id).await.unwrap();
    assert_eq!(stored.review_count, 2);
    assert!((stored.total_rating - 2.5).abs() < f64::EPSILON);

    db.reviews().delete(changed.review.id).await.unwrap();
    db.reviews().delete(kept.review.id).await.unwrap();
    let stored = db.trainers().get_required(profile.id).await.unwrap();
    assert_eq!(stored.review_count, 0);
    assert!(stored.total_rating.abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_one_review_per_client_and_trainer() {
    let ctx = create_test_context().await.unwrap();
    let db = ctx.database();
    let (_, _, profile) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();
    let (client, _) = create_test_user(&ctx, "client@example.com", UserRole::Client)
        .await
        .unwrap();

    db.reviews().create(profile.id, client.id, &rating(5)).await.unwrap();
    assert!(db.reviews().exists_for(profile.id, client.id).await.unwrap());

    let duplicate = db.reviews().create(profile.id, client.id, &rating(2)).await;
    assert!(duplicate.is_err());

    let stored = db.trainers().get_required(profile.id).await.unwrap();
    assert_eq!(stored.review_count, 1);
    assert!((stored.total_rating - 5.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_deleting_a_missing_review_is_not_found() {
    let ctx = create_test_context().await.unwrap();

    let result = ctx.database().reviews().delete(404).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_delete_for_user_without_profile_returns_false() {
    let ctx = create_test_context().await.unwrap();
    let (client, _) = create_test_user(&ctx, "client@example.com", UserRole::Client)
        .await
        .unwrap();

    let deleted = ctx.database().trainers().delete_for_user(client.id).await.unwrap();

    assert!(!deleted);
    let unchanged = ctx.database().get_user_required(client.id).await.unwrap();
    assert_eq!(unchanged.role, UserRole::Client);
}

#[tokio::test]
async fn test_delete_for_user_cascades_to_links() {
    let ctx = create_test_context().await.unwrap();
    let db = ctx.database();
    let yoga = create_test_specialization(&ctx, "Yoga").await.unwrap();
    let (user, _, _) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();
    let profile = db
        .trainers()
        .create(user.id, &trainer_fields("Iasi", 30.0), &[yoga.id])
        .await;
    assert!(profile.is_err(), "a user holds at most one profile");

    let (other, _) = create_test_user(&ctx, "second@example.com", UserRole::Client)
        .await
        .unwrap();
    let linked = db
        .trainers()
        .create(other.id, &trainer_fields("Cluj-Napoca", 45.0), &[yoga.id, yoga.id])
        .await
        .unwrap();
    assert_eq!(
        db.specializations()
            .summaries_for_trainer(linked.id)
            .await
            .unwrap()
            .len(),
        1
    );

    assert!(db.trainers().delete_for_user(other.id).await.unwrap());
    assert!(db
        .specializations()
        .summaries_for_trainer(linked.id)
        .await
        .unwrap()
        .is_empty());
    assert!(db.specializations().list_links().await.unwrap().is_empty());
    assert_eq!(
        db.get_user_required(other.id).await.unwrap().role,
        UserRole::Client
    );
}

#[tokio::test]
async fn test_gallery_keeps_exactly_one_primary() {
    let ctx = create_test_context().await.unwrap();
    let images = ctx.database().images();
    let (_, _, profile) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();

    let batch = images
        .append(
            profile.id,
            &[image("https://cdn.example.com/a.png"), image("https://cdn.example.com/b.png")],
        )
        .await
        .unwrap();
    let later = images
        .append(profile.id, &[image("https://cdn.example.com/c.png")])
        .await
        .unwrap();
    assert!(batch[0].is_primary);
    assert!(!batch[1].is_primary);
    assert!(!later[0].is_primary);
    assert_eq!(later[0].display_order, 2);

    images.delete(&batch[1]).await.unwrap();
    let remaining = images.list_for_trainer(profile.id).await.unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(remaining[0].is_primary);
    assert_eq!(remaining[0].id, batch[0].id);

    images.delete(&batch[0]).await.unwrap();
    let remaining = images.list_for_trainer(profile.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, later[0].id);
    assert!(remaining[0].is_primary);

    images.delete(&later[0]).await.unwrap();
    assert!(images.list_for_trainer(profile.id).await.unwrap().is_empty());
    assert!(images.delete(&later[0]).await.is_err());

    let fresh = images
        .append(profile.id, &[image("https://cdn.example.com/d.png")])
        .await
        .unwrap();
    assert!(fresh[0].is_primary);
    assert_eq!(fresh[0].display_order, 0);
}

#[tokio::test]
async fn test_profile_views_increment() {
    let ctx = create_test_context().await.unwrap();
    let trainers = ctx.database().trainers();
    let (_, _, profile) = create_test_trainer(&ctx, "coach@example.com", trainer_fields("Iasi", 30.0))
        .await
        .unwrap();

    trainers.increment_views(profile.id).await.unwrap();
    trainers.increment_views(profile.id).await.unwrap();

    assert_eq!(trainers.get_required(profile.id).await.unwrap().profile_views, 2);
}

#[tokio::test]
async fn test_file_database_survives_reconnect() {
    let temp_dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite:{}", temp_dir.path().join("trainee.db").display()),
        max_connections: 2,
    };

    let first = Database::new(&config).await.unwrap();
    first
        .specializations()
        .create(&NewSpecialization {
            name: "Calisthenics".to_owned(),
            description: None,
            icon_url: None,
            is_active: None,
        })
        .await
        .unwrap();
    first.pool().close().await;

    let second = Database::new(&config).await.unwrap();
    let names: Vec<String> = second
        .specializations()
        .list_active()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Calisthenics"]);
    second.ping().await.unwrap();
}
