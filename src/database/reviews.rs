// ABOUTME: Review database operations with transactional rating aggregation
// ABOUTME: Every insert, update and delete recomputes the trainer's review_count and total_rating
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use super::{is_unique_violation, now_timestamp, parse_timestamp};
use crate::errors::{AppError, AppResult};
use crate::models::{round_rating, Review, ReviewInput, ReviewWithClient, UserSummary};
use crate::pagination::{PageRequest, Pagination};

const REVIEW_WITH_CLIENT_SELECT: &str = "SELECT r.id, r.trainer_id, r.client_id, r.rating, \
     r.review_text, r.is_verified, r.is_reported, r.created_at, r.updated_at, \
     u.first_name, u.last_name, u.profile_image_url \
     FROM reviews r JOIN users u ON u.id = r.client_id";

/// Review database operations
pub struct ReviewsManager {
    pool: SqlitePool,
}

impl ReviewsManager {
    /// Create a new reviews manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a review and refresh the trainer aggregate
    ///
    /// # Errors
    ///
    /// Returns an error if the client already reviewed this trainer or a
    /// statement fails
    pub async fn create(
        &self,
        trainer_id: i64,
        client_id: i64,
        input: &ReviewInput,
    ) -> AppResult<ReviewWithClient> {
        let now = now_timestamp();
        let mut tx = self.begin().await?;

        let review_id = sqlx::query(
            r"
            INSERT INTO reviews (
                trainer_id, client_id, rating, review_text, is_verified, is_reported,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, 0, 0, ?5, ?5)
            ",
        )
        .bind(trainer_id)
        .bind(client_id)
        .bind(input.rating)
        .bind(&input.review_text)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::invalid_input("You have already reviewed this trainer")
            } else {
                AppError::database(format!("Failed to create review: {e}"))
            }
        })?
        .last_insert_rowid();

        refresh_trainer_rating(&mut tx, trainer_id).await?;
        Self::commit(tx).await?;

        info!(review_id, trainer_id, client_id, "Review created");
        self.get_with_client_required(review_id).await
    }

    /// Get a review by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, review_id: i64) -> AppResult<Option<Review>> {
        let row = sqlx::query(
            r"
            SELECT id, trainer_id, client_id, rating, review_text, is_verified, is_reported,
                   created_at, updated_at
            FROM reviews WHERE id = ?1
            ",
        )
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get review: {e}")))?;
        row.as_ref().map(row_to_review).transpose()
    }

    async fn get_with_client_required(&self, review_id: i64) -> AppResult<ReviewWithClient> {
        let sql = format!("{REVIEW_WITH_CLIENT_SELECT} WHERE r.id = ?1");
        let row = sqlx::query(&sql)
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get review: {e}")))?
            .ok_or_else(|| AppError::not_found("Review not found"))?;
        row_to_review_with_client(&row)
    }

    /// Whether `client_id` already reviewed `trainer_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn exists_for(&self, trainer_id: i64, client_id: i64) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reviews WHERE trainer_id = ?1 AND client_id = ?2",
        )
        .bind(trainer_id)
        .bind(client_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check existing review: {e}")))?;
        Ok(count > 0)
    }

    /// Reviews of a trainer, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_for_trainer(
        &self,
        trainer_id: i64,
        page: PageRequest,
    ) -> AppResult<(Vec<ReviewWithClient>, Pagination)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE trainer_id = ?1")
            .bind(trainer_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count reviews: {e}")))?;

        let sql = format!(
            "{REVIEW_WITH_CLIENT_SELECT} WHERE r.trainer_id = ?1 \
             ORDER BY r.created_at DESC, r.id DESC LIMIT ?2 OFFSET ?3"
        );
        let rows = sqlx::query(&sql)
            .bind(trainer_id)
            .bind(i64::from(page.limit))
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list reviews: {e}")))?;

        let reviews = rows
            .iter()
            .map(row_to_review_with_client)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((reviews, Pagination::new(total, page)))
    }

    /// Replace rating and text of a review and refresh the trainer aggregate
    ///
    /// # Errors
    ///
    /// Returns an error if the review does not exist or a statement fails
    pub async fn update(&self, review_id: i64, input: &ReviewInput) -> AppResult<ReviewWithClient> {
        let mut tx = self.begin().await?;

        let trainer_id: i64 = sqlx::query_scalar(
            r"
            UPDATE reviews SET rating = ?1, review_text = ?2, updated_at = ?3
            WHERE id = ?4
            RETURNING trainer_id
            ",
        )
        .bind(input.rating)
        .bind(&input.review_text)
        .bind(now_timestamp())
        .bind(review_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update review: {e}")))?
        .ok_or_else(|| AppError::not_found("Review not found"))?;

        refresh_trainer_rating(&mut tx, trainer_id).await?;
        Self::commit(tx).await?;

        debug!(review_id, trainer_id, "Review updated");
        self.get_with_client_required(review_id).await
    }

    /// Delete a review and refresh the trainer aggregate
    ///
    /// # Errors
    ///
    /// Returns an error if the review does not exist or a statement fails
    pub async fn delete(&self, review_id: i64) -> AppResult<()> {
        let mut tx = self.begin().await?;

        let trainer_id: i64 =
            sqlx::query_scalar("DELETE FROM reviews WHERE id = ?1 RETURNING trainer_id")
                .bind(review_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to delete review: {e}")))?
                .ok_or_else(|| AppError::not_found("Review not found"))?;

        refresh_trainer_rating(&mut tx, trainer_id).await?;
        Self::commit(tx).await?;

        info!(review_id, trainer_id, "Review deleted");
        Ok(())
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))
    }

    async fn commit(tx: Transaction<'static, Sqlite>) -> AppResult<()> {
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit review change: {e}")))
    }
}

/// Recompute `review_count` and `total_rating` (average, two decimals) for a
/// trainer from its reviews, inside the caller's transaction
async fn refresh_trainer_rating(tx: &mut Transaction<'_, Sqlite>, trainer_id: i64) -> AppResult<()> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS review_count, AVG(rating) AS average FROM reviews WHERE trainer_id = ?1",
    )
    .bind(trainer_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| AppError::database(format!("Failed to aggregate ratings: {e}")))?;

    let review_count: i64 = row.get("review_count");
    let average: Option<f64> = row.get("average");
    let total_rating = average.map_or(0.0, round_rating);

    sqlx::query(
        "UPDATE trainer_profiles SET review_count = ?1, total_rating = ?2, updated_at = ?3 WHERE id = ?4",
    )
    .bind(review_count)
    .bind(total_rating)
    .bind(now_timestamp())
    .bind(trainer_id)
    .execute(&mut **tx)
    .await
    .map_err(|e| AppError::database(format!("Failed to update trainer rating: {e}")))?;

    debug!(trainer_id, review_count, total_rating, "Trainer rating refreshed");
    Ok(())
}

fn row_to_review(row: &SqliteRow) -> AppResult<Review> {
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");
    Ok(Review {
        id: row.get("id"),
        trainer_id: row.get("trainer_id"),
        client_id: row.get("client_id"),
        rating: row.get("rating"),
        review_text: row.get("review_text"),
        is_verified: row.get("is_verified"),
        is_reported: row.get("is_reported"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn row_to_review_with_client(row: &SqliteRow) -> AppResult<ReviewWithClient> {
    let review = row_to_review(row)?;
    let client = UserSummary {
        id: review.client_id,
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        profile_image_url: row.get("profile_image_url"),
    };
    Ok(ReviewWithClient { review, client })
}
