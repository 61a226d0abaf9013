// ABOUTME: Trainer gallery image rows
// ABOUTME: Appends images with increasing display order and keeps exactly one primary image
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp};
use crate::errors::{AppError, AppResult};
use crate::models::TrainerImage;

/// An uploaded object to record against a trainer
#[derive(Debug, Clone)]
pub struct NewTrainerImage {
    /// Public URL of the stored object
    pub image_url: String,
    /// Accessibility text
    pub alt_text: Option<String>,
}

/// Trainer image database operations
pub struct ImagesManager {
    pool: SqlitePool,
}

impl ImagesManager {
    /// Create a new images manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Images of a trainer in gallery order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_for_trainer(&self, trainer_id: i64) -> AppResult<Vec<TrainerImage>> {
        let rows = sqlx::query(
            r"
            SELECT id, trainer_id, image_url, alt_text, is_primary, display_order, created_at
            FROM trainer_images WHERE trainer_id = ?1
            ORDER BY display_order ASC, created_at ASC
            ",
        )
        .bind(trainer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list trainer images: {e}")))?;
        rows.iter().map(row_to_image).collect()
    }

    /// Get an image by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, image_id: Uuid) -> AppResult<Option<TrainerImage>> {
        let row = sqlx::query(
            r"
            SELECT id, trainer_id, image_url, alt_text, is_primary, display_order, created_at
            FROM trainer_images WHERE id = ?1
            ",
        )
        .bind(image_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get trainer image: {e}")))?;
        row.as_ref().map(row_to_image).transpose()
    }

    /// Append images to a trainer's gallery
    ///
    /// Display order continues after the current last image. When the trainer
    /// has no primary image yet, the first appended one becomes primary.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn append(
        &self,
        trainer_id: i64,
        images: &[NewTrainerImage],
    ) -> AppResult<Vec<TrainerImage>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let row = sqlx::query(
            r"
            SELECT COALESCE(MAX(display_order), -1) AS last_order,
                   COALESCE(SUM(is_primary), 0) AS primaries
            FROM trainer_images WHERE trainer_id = ?1
            ",
        )
        .bind(trainer_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to inspect trainer gallery: {e}")))?;
        let last_order: i64 = row.get("last_order");
        let primaries: i64 = row.get("primaries");

        let mut created = Vec::with_capacity(images.len());
        for (offset, image) in (1_i64..).zip(images) {
            let record = TrainerImage {
                id: Uuid::new_v4(),
                trainer_id,
                image_url: image.image_url.clone(),
                alt_text: image.alt_text.clone(),
                is_primary: primaries == 0 && offset == 1,
                display_order: last_order + offset,
                created_at: Utc::now(),
            };
            sqlx::query(
                r"
                INSERT INTO trainer_images
                    (id, trainer_id, image_url, alt_text, is_primary, display_order, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ",
            )
            .bind(record.id.to_string())
            .bind(record.trainer_id)
            .bind(&record.image_url)
            .bind(&record.alt_text)
            .bind(record.is_primary)
            .bind(record.display_order)
            .bind(format_timestamp(record.created_at))
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to record trainer image: {e}")))?;
            created.push(record);
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit trainer images: {e}")))?;

        info!(trainer_id, added = created.len(), "Trainer images recorded");
        Ok(created)
    }

    /// Delete an image row, promoting the next image when the primary goes
    ///
    /// # Errors
    ///
    /// Returns an error if the image does not exist or a statement fails
    pub async fn delete(&self, image: &TrainerImage) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let deleted = sqlx::query("DELETE FROM trainer_images WHERE id = ?1")
            .bind(image.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete trainer image: {e}")))?
            .rows_affected();
        if deleted == 0 {
            return Err(AppError::not_found("Image not found"));
        }

        if image.is_primary {
            sqlx::query(
                r"
                UPDATE trainer_images SET is_primary = 1
                WHERE id = (
                    SELECT id FROM trainer_images WHERE trainer_id = ?1
                    ORDER BY display_order ASC, created_at ASC LIMIT 1
                )
                ",
            )
            .bind(image.trainer_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to promote primary image: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit image deletion: {e}")))?;
        Ok(())
    }
}

fn row_to_image(row: &SqliteRow) -> AppResult<TrainerImage> {
    let id: String = row.get("id");
    let created_at: String = row.get("created_at");
    Ok(TrainerImage {
        id: Uuid::parse_str(&id).map_err(|e| AppError::internal(format!("Invalid image id: {e}")))?,
        trainer_id: row.get("trainer_id"),
        image_url: row.get("image_url"),
        alt_text: row.get("alt_text"),
        is_primary: row.get("is_primary"),
        display_order: row.get("display_order"),
        created_at: parse_timestamp(&created_at)?,
    })
}
