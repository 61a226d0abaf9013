// ABOUTME: Trainer profile database operations
// ABOUTME: Profile creation with role promotion, lookup, view counting, updates and removal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::search::search_fold;
use super::{now_timestamp, parse_timestamp, ImagesManager, SpecializationsManager};
use crate::errors::{AppError, AppResult};
use crate::models::{
    ExperienceLevel, TrainerDetails, TrainerProfile, TrainerProfileFields, UserRole, UserSummary,
};

/// Column list shared by every profile query
pub(crate) const PROFILE_COLUMNS: &str = "id, user_id, bio, experience_years, hourly_rate, \
     session_rate, location_city, location_state, location_country, latitude, longitude, \
     is_active, is_featured, is_available, profile_views, total_rating, review_count, \
     created_at, updated_at";

/// Trainer profile database operations
pub struct TrainersManager {
    pool: SqlitePool,
}

impl TrainersManager {
    /// Create a new trainers manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a profile for `user_id`, promote the user to trainer and link
    /// the given specializations at beginner level, all in one transaction
    ///
    /// Callers validate the specialization ids beforehand.
    ///
    /// # Errors
    ///
    /// Returns an error if the user already has a profile or any statement fails
    pub async fn create(
        &self,
        user_id: i64,
        fields: &TrainerProfileFields,
        specialization_ids: &[i64],
    ) -> AppResult<TrainerProfile> {
        let now = now_timestamp();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query("UPDATE users SET role = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(UserRole::Trainer.as_str())
            .bind(&now)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to promote user to trainer: {e}")))?;

        let result = sqlx::query(
            r"
            INSERT INTO trainer_profiles (
                user_id, bio, experience_years, hourly_rate, session_rate,
                location_city, location_state, location_country, latitude, longitude,
                is_active, is_featured, is_available, profile_views, total_rating, review_count,
                created_at, updated_at,
                bio_search, location_city_search, location_state_search, location_country_search
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1, 0, 1, 0, 0, 0, ?11, ?11,
                ?12, ?13, ?14, ?15)
            ",
        )
        .bind(user_id)
        .bind(&fields.bio)
        .bind(fields.experience_years)
        .bind(fields.hourly_rate)
        .bind(fields.session_rate)
        .bind(&fields.location_city)
        .bind(&fields.location_state)
        .bind(&fields.location_country)
        .bind(fields.latitude)
        .bind(fields.longitude)
        .bind(&now)
        .bind(fields.bio.as_deref().map(search_fold))
        .bind(fields.location_city.as_deref().map(search_fold))
        .bind(fields.location_state.as_deref().map(search_fold))
        .bind(fields.location_country.as_deref().map(search_fold))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if super::is_unique_violation(&e) {
                AppError::invalid_input("Trainer profile already exists")
            } else {
                AppError::database(format!("Failed to create trainer profile: {e}"))
            }
        })?;
        let trainer_id = result.last_insert_rowid();

        for specialization_id in specialization_ids {
            sqlx::query(
                r"
                INSERT OR IGNORE INTO trainer_specializations
                    (id, trainer_id, specialization_id, experience_level, certification, created_at)
                VALUES (?1, ?2, ?3, ?4, NULL, ?5)
                ",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(trainer_id)
            .bind(specialization_id)
            .bind(ExperienceLevel::Beginner.as_str())
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to link specialization: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit trainer creation: {e}")))?;

        info!(user_id, trainer_id, "Trainer profile created");
        self.get_required(trainer_id).await
    }

    /// Get a profile by its id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, trainer_id: i64) -> AppResult<Option<TrainerProfile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM trainer_profiles WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(trainer_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get trainer profile: {e}")))?;
        row.as_ref().map(row_to_profile).transpose()
    }

    /// Get a profile by its id, returning an error if not found
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the profile does not exist
    pub async fn get_required(&self, trainer_id: i64) -> AppResult<TrainerProfile> {
        self.get(trainer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Trainer profile not found"))
    }

    /// Get the profile owned by a user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_by_user(&self, user_id: i64) -> AppResult<Option<TrainerProfile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM trainer_profiles WHERE user_id = ?1");
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get trainer profile: {e}")))?;
        row.as_ref().map(row_to_profile).transpose()
    }

    /// Load the owner, images and specializations of a profile
    ///
    /// # Errors
    ///
    /// Returns an error if any of the lookups fail
    pub async fn details(&self, profile: TrainerProfile) -> AppResult<TrainerDetails> {
        let row = sqlx::query(
            "SELECT id, first_name, last_name, profile_image_url FROM users WHERE id = ?1",
        )
        .bind(profile.user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get trainer owner: {e}")))?
        .ok_or_else(|| AppError::not_found("Trainer owner not found"))?;

        let user = UserSummary {
            id: row.get("id"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            profile_image_url: row.get("profile_image_url"),
        };
        let images = ImagesManager::new(self.pool.clone())
            .list_for_trainer(profile.id)
            .await?;
        let specializations = SpecializationsManager::new(self.pool.clone())
            .summaries_for_trainer(profile.id)
            .await?;

        Ok(TrainerDetails::new(profile, user, images, specializations))
    }

    /// Count a profile view
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails
    pub async fn increment_views(&self, trainer_id: i64) -> AppResult<()> {
        sqlx::query("UPDATE trainer_profiles SET profile_views = profile_views + 1 WHERE id = ?1")
            .bind(trainer_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count profile view: {e}")))?;
        Ok(())
    }

    /// Overwrite the editable fields of a profile
    ///
    /// `fields` is expected to be already merged onto the stored profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile does not exist or the update fails
    pub async fn update(
        &self,
        trainer_id: i64,
        fields: &TrainerProfileFields,
        is_available: Option<bool>,
    ) -> AppResult<TrainerProfile> {
        let result = sqlx::query(
            r"
            UPDATE trainer_profiles SET
                bio = ?1,
                experience_years = ?2,
                hourly_rate = ?3,
                session_rate = ?4,
                location_city = ?5,
                location_state = ?6,
                location_country = ?7,
                latitude = ?8,
                longitude = ?9,
                is_available = COALESCE(?10, is_available),
                updated_at = ?11,
                bio_search = ?13,
                location_city_search = ?14,
                location_state_search = ?15,
                location_country_search = ?16
            WHERE id = ?12
            ",
        )
        .bind(&fields.bio)
        .bind(fields.experience_years)
        .bind(fields.hourly_rate)
        .bind(fields.session_rate)
        .bind(&fields.location_city)
        .bind(&fields.location_state)
        .bind(&fields.location_country)
        .bind(fields.latitude)
        .bind(fields.longitude)
        .bind(is_available)
        .bind(now_timestamp())
        .bind(trainer_id)
        .bind(fields.bio.as_deref().map(search_fold))
        .bind(fields.location_city.as_deref().map(search_fold))
        .bind(fields.location_state.as_deref().map(search_fold))
        .bind(fields.location_country.as_deref().map(search_fold))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update trainer profile: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Trainer profile not found"));
        }
        self.get_required(trainer_id).await
    }

    /// Delete the profile owned by `user_id` and revert the owner to client
    ///
    /// Links, images and reviews go with the profile through cascades.
    /// Returns `false` when the user had no profile.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn delete_for_user(&self, user_id: i64) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let deleted = sqlx::query("DELETE FROM trainer_profiles WHERE user_id = ?1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete trainer profile: {e}")))?
            .rows_affected();

        if deleted == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE users SET role = ?1, updated_at = ?2 WHERE id = ?3 AND role = ?4")
            .bind(UserRole::Client.as_str())
            .bind(now_timestamp())
            .bind(user_id)
            .bind(UserRole::Trainer.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to revert user role: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit trainer deletion: {e}")))?;

        info!(user_id, "Trainer profile deleted");
        Ok(true)
    }

    pub(crate) const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Map a `trainer_profiles` row selected with [`PROFILE_COLUMNS`]
pub(crate) fn row_to_profile(row: &SqliteRow) -> AppResult<TrainerProfile> {
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(TrainerProfile {
        id: row.get("id"),
        user_id: row.get("user_id"),
        bio: row.get("bio"),
        experience_years: row.get("experience_years"),
        hourly_rate: row.get("hourly_rate"),
        session_rate: row.get("session_rate"),
        location_city: row.get("location_city"),
        location_state: row.get("location_state"),
        location_country: row.get("location_country"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        is_active: row.get("is_active"),
        is_featured: row.get("is_featured"),
        is_available: row.get("is_available"),
        profile_views: row.get("profile_views"),
        total_rating: row.get("total_rating"),
        review_count: row.get("review_count"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
