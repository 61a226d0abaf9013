// ABOUTME: Specialization catalog and trainer-specialization link database operations
// ABOUTME: Creation, active listing, id validation, link add/list/remove and default seeding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::{is_unique_violation, now_timestamp, parse_timestamp};
use crate::errors::{AppError, AppResult};
use crate::models::{
    ExperienceLevel, NewSpecialization, NewTrainerSpecialization, Specialization,
    SpecializationLinkSummary, TrainerSpecialization,
};

/// Specializations inserted by the seed binary
pub const DEFAULT_SPECIALIZATIONS: &[(&str, &str)] = &[
    ("Yoga", "Flexibility, balance and breathing practice"),
    ("CrossFit", "High-intensity functional training"),
    ("Personal Training", "One-on-one coaching tailored to individual goals"),
    ("Pilates", "Core strength and controlled movement"),
    ("Nutrition", "Diet planning and nutritional guidance"),
    ("Strength", "Resistance training and powerlifting"),
    ("Cardio", "Endurance and cardiovascular conditioning"),
    ("Martial Arts", "Combat sports and self-defense"),
];

/// Owner name as shown in the link listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedTrainerUser {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Profile picture
    pub profile_image_url: Option<String>,
}

/// Trainer as shown in the link listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedTrainer {
    /// Profile id
    pub id: i64,
    /// Biography
    pub bio: Option<String>,
    /// Years of experience
    pub experience_years: Option<i64>,
    /// Hourly price
    pub hourly_rate: Option<f64>,
    /// Owner
    pub user: LinkedTrainerUser,
}

/// Link enriched with its trainer and specialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerSpecializationEntry {
    /// Link columns
    #[serde(flatten)]
    pub link: TrainerSpecialization,
    /// Linked trainer
    pub trainer: LinkedTrainer,
    /// Linked specialization
    pub specialization: Specialization,
}

/// Specialization database operations
pub struct SpecializationsManager {
    pool: SqlitePool,
}

impl SpecializationsManager {
    /// Create a new specializations manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a specialization
    ///
    /// # Errors
    ///
    /// Returns a conflict error if the name is taken (case-insensitively) or a
    /// database error if the insert fails
    pub async fn create(&self, request: &NewSpecialization) -> AppResult<Specialization> {
        let id = sqlx::query(
            r"
            INSERT INTO specializations (name, description, icon_url, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.icon_url)
        .bind(request.is_active.unwrap_or(true))
        .bind(now_timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists(format!(
                    "Specialization '{}' already exists",
                    request.name
                ))
            } else {
                AppError::database(format!("Failed to create specialization: {e}"))
            }
        })?
        .last_insert_rowid();

        self.get(id)
            .await?
            .ok_or_else(|| AppError::internal("Specialization vanished after insert"))
    }

    /// Get a specialization by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, id: i64) -> AppResult<Option<Specialization>> {
        let row = sqlx::query(
            "SELECT id, name, description, icon_url, is_active, created_at FROM specializations WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get specialization: {e}")))?;
        row.as_ref().map(row_to_specialization).transpose()
    }

    /// Active specializations ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_active(&self) -> AppResult<Vec<Specialization>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, description, icon_url, is_active, created_at
            FROM specializations WHERE is_active = 1 ORDER BY name ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list specializations: {e}")))?;
        rows.iter().map(row_to_specialization).collect()
    }

    /// Ids from `ids` that do not name an active specialization
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn unusable_ids(&self, ids: &[i64]) -> AppResult<Vec<i64>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder =
            QueryBuilder::<Sqlite>::new("SELECT id FROM specializations WHERE is_active = 1 AND id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let active: Vec<i64> = builder
            .build_query_scalar::<i64>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to validate specializations: {e}")))?;

        Ok(ids.iter().copied().filter(|id| !active.contains(id)).collect())
    }

    /// Specializations linked to a trainer, by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn summaries_for_trainer(
        &self,
        trainer_id: i64,
    ) -> AppResult<Vec<SpecializationLinkSummary>> {
        let rows = sqlx::query(
            r"
            SELECT s.id, s.name, s.description, s.icon_url, ts.experience_level, ts.certification
            FROM trainer_specializations ts
            JOIN specializations s ON s.id = ts.specialization_id
            WHERE ts.trainer_id = ?1
            ORDER BY s.name ASC
            ",
        )
        .bind(trainer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load trainer specializations: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| {
                let level: String = row.get("experience_level");
                SpecializationLinkSummary {
                    id: row.get("id"),
                    name: row.get("name"),
                    description: row.get("description"),
                    icon_url: row.get("icon_url"),
                    experience_level: ExperienceLevel::parse(&level),
                    certification: row.get("certification"),
                }
            })
            .collect())
    }

    /// Link specializations to a trainer, skipping ones already linked
    ///
    /// Returns only the links that were created.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails
    pub async fn add_links(
        &self,
        trainer_id: i64,
        links: &[NewTrainerSpecialization],
    ) -> AppResult<Vec<TrainerSpecialization>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let mut created = Vec::new();
        for link in links {
            let id = Uuid::new_v4();
            let now = chrono::Utc::now();
            let inserted = sqlx::query(
                r"
                INSERT OR IGNORE INTO trainer_specializations
                    (id, trainer_id, specialization_id, experience_level, certification, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
            )
            .bind(id.to_string())
            .bind(trainer_id)
            .bind(link.specialization_id)
            .bind(link.experience_level.as_str())
            .bind(&link.certification)
            .bind(super::format_timestamp(now))
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to link specialization: {e}")))?
            .rows_affected();

            if inserted == 1 {
                created.push(TrainerSpecialization {
                    id,
                    trainer_id,
                    specialization_id: link.specialization_id,
                    experience_level: link.experience_level,
                    certification: link.certification.clone(),
                    created_at: now,
                });
            }
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit specialization links: {e}")))?;

        info!(trainer_id, added = created.len(), "Specializations linked");
        Ok(created)
    }

    /// Every link, newest first, with trainer and specialization details
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_links(&self) -> AppResult<Vec<TrainerSpecializationEntry>> {
        let rows = sqlx::query(
            r"
            SELECT ts.id AS link_id, ts.trainer_id, ts.specialization_id, ts.experience_level,
                   ts.certification, ts.created_at AS link_created_at,
                   tp.bio, tp.experience_years, tp.hourly_rate,
                   u.first_name, u.last_name, u.profile_image_url,
                   s.id, s.name, s.description, s.icon_url, s.is_active, s.created_at
            FROM trainer_specializations ts
            JOIN trainer_profiles tp ON tp.id = ts.trainer_id
            JOIN users u ON u.id = tp.user_id
            JOIN specializations s ON s.id = ts.specialization_id
            ORDER BY ts.created_at DESC, ts.rowid DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list specialization links: {e}")))?;

        rows.iter().map(row_to_entry).collect()
    }

    /// Remove a link from a trainer; `false` if it did not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn remove_link(&self, trainer_id: i64, specialization_id: i64) -> AppResult<bool> {
        let deleted = sqlx::query(
            "DELETE FROM trainer_specializations WHERE trainer_id = ?1 AND specialization_id = ?2",
        )
        .bind(trainer_id)
        .bind(specialization_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to remove specialization link: {e}")))?
        .rows_affected();
        Ok(deleted > 0)
    }

    /// Insert [`DEFAULT_SPECIALIZATIONS`] that are not present yet
    ///
    /// Returns how many were inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails
    pub async fn seed_defaults(&self) -> AppResult<u64> {
        let mut inserted = 0;
        for (name, description) in DEFAULT_SPECIALIZATIONS {
            inserted += sqlx::query(
                r"
                INSERT OR IGNORE INTO specializations (name, description, icon_url, is_active, created_at)
                VALUES (?1, ?2, NULL, 1, ?3)
                ",
            )
            .bind(*name)
            .bind(*description)
            .bind(now_timestamp())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to seed specialization {name}: {e}")))?
            .rows_affected();
        }
        Ok(inserted)
    }
}

fn row_to_specialization(row: &SqliteRow) -> AppResult<Specialization> {
    let created_at: String = row.get("created_at");
    Ok(Specialization {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        icon_url: row.get("icon_url"),
        is_active: row.get("is_active"),
        created_at: parse_timestamp(&created_at)?,
    })
}

fn row_to_entry(row: &SqliteRow) -> AppResult<TrainerSpecializationEntry> {
    let link_id: String = row.get("link_id");
    let level: String = row.get("experience_level");
    let link_created_at: String = row.get("link_created_at");

    let link = TrainerSpecialization {
        id: Uuid::parse_str(&link_id)
            .map_err(|e| AppError::internal(format!("Invalid link id: {e}")))?,
        trainer_id: row.get("trainer_id"),
        specialization_id: row.get("specialization_id"),
        experience_level: ExperienceLevel::parse(&level),
        certification: row.get("certification"),
        created_at: parse_timestamp(&link_created_at)?,
    };
    let trainer = LinkedTrainer {
        id: link.trainer_id,
        bio: row.get("bio"),
        experience_years: row.get("experience_years"),
        hourly_rate: row.get("hourly_rate"),
        user: LinkedTrainerUser {
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            profile_image_url: row.get("profile_image_url"),
        },
    };

    Ok(TrainerSpecializationEntry {
        link,
        trainer,
        specialization: row_to_specialization(row)?,
    })
}
