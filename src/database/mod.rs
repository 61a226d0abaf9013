// ABOUTME: SQLite database handle, connection setup and embedded migrations
// ABOUTME: Shared row helpers plus the per-domain managers for trainers, reviews and media
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Email verification token storage
pub mod email_verification;
/// Trainer gallery images
pub mod images;
/// Reviews and rating aggregation
pub mod reviews;
/// Trainer search query assembly
pub mod search;
/// Specializations and trainer links
pub mod specializations;
/// Trainer profiles
pub mod trainers;
/// User accounts
pub mod users;

pub use images::{ImagesManager, NewTrainerImage};
pub use reviews::ReviewsManager;
pub use search::{SearchPage, TrainerSearchItem, TrainerSearchParams, TrainerSearchQuery};
pub use specializations::{
    SpecializationsManager, TrainerSpecializationEntry, DEFAULT_SPECIALIZATIONS,
};
pub use trainers::TrainersManager;

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{AppError, AppResult};

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the configured database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL is invalid or malformed
    /// - Database connection fails
    /// - Migration process fails
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        let db = Self::connect(&config.url, config.max_connections).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Open a pool without running migrations
    ///
    /// In-memory databases live inside a single connection, so the pool is
    /// pinned to exactly one connection that is never recycled.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the connection fails
    pub async fn connect(database_url: &str, max_connections: u32) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        Ok(Self { pool })
    }

    /// Get a reference to the database pool for managers and advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run all pending migrations embedded at compile time
    ///
    /// # Errors
    ///
    /// Returns an error if any migration fails
    pub async fn migrate(&self) -> AppResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Check that the database answers `SELECT 1`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// Trainer profile manager sharing this pool
    #[must_use]
    pub fn trainers(&self) -> TrainersManager {
        TrainersManager::new(self.pool.clone())
    }

    /// Review manager sharing this pool
    #[must_use]
    pub fn reviews(&self) -> ReviewsManager {
        ReviewsManager::new(self.pool.clone())
    }

    /// Specialization manager sharing this pool
    #[must_use]
    pub fn specializations(&self) -> SpecializationsManager {
        SpecializationsManager::new(self.pool.clone())
    }

    /// Image manager sharing this pool
    #[must_use]
    pub fn images(&self) -> ImagesManager {
        ImagesManager::new(self.pool.clone())
    }
}

/// Format a timestamp the way every `*_at` column stores it
///
/// Fixed precision keeps lexical order equal to chronological order.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time in column format
#[must_use]
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Parse a stored timestamp
///
/// # Errors
///
/// Returns an internal error if the column does not hold RFC 3339 text
pub fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid datetime '{value}': {e}")))
}

/// Parse a nullable stored timestamp
///
/// # Errors
///
/// Returns an internal error if the column holds malformed text
pub fn parse_optional_timestamp(value: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    value.map(parse_timestamp).transpose()
}

/// Whether a sqlx error is a UNIQUE constraint violation
#[must_use]
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db_error| db_error.is_unique_violation())
}
