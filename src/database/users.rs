// ABOUTME: User management database operations
// ABOUTME: Handles user registration, lookup, login bookkeeping and profile updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use super::search::search_fold;
use super::{is_unique_violation, now_timestamp, parse_optional_timestamp, parse_timestamp, Database};
use crate::constants::messages;
use crate::errors::{AppError, AppResult};
use crate::models::{NewUser, User, UserProfileUpdate, UserRole};

/// Column list shared by every user query
pub(crate) const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, phone, \
     role, profile_image_url, is_verified, is_active, last_login_at, \
     email_verification_token_hash, email_verification_expires_at, email_verified_at, \
     created_at, updated_at";

impl Database {
    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The email is already registered
    /// - Database operation fails
    pub async fn create_user(&self, user: &NewUser) -> AppResult<User> {
        let now = now_timestamp();
        let result = sqlx::query(
            r"
            INSERT INTO users (
                email, password_hash, first_name, last_name, phone, role,
                is_verified, is_active, created_at, updated_at,
                first_name_search, last_name_search
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 1, ?7, ?7, ?8, ?9)
            ",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(user.role.as_str())
        .bind(&now)
        .bind(search_fold(&user.first_name))
        .bind(search_fold(&user.last_name))
        .execute(self.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists(messages::USER_ALREADY_EXISTS)
            } else {
                AppError::database(format!("Failed to create user: {e}"))
            }
        })?;

        let id = result.last_insert_rowid();
        debug!(user_id = id, "User row inserted");
        self.get_user_required(id).await
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;
        row.as_ref().map(row_to_user).transpose()
    }

    /// Get a user by ID, returning an error if not found
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database query fails
    /// - The user is not found
    pub async fn get_user_required(&self, user_id: i64) -> AppResult<User> {
        self.get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    /// Get a user by (already normalized) email
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;
        row.as_ref().map(row_to_user).transpose()
    }

    /// Record a successful login
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails
    pub async fn update_last_login(&self, user_id: i64) -> AppResult<()> {
        let now = now_timestamp();
        sqlx::query("UPDATE users SET last_login_at = ?1, updated_at = ?1 WHERE id = ?2")
            .bind(&now)
            .bind(user_id)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to update last login: {e}")))?;
        Ok(())
    }

    /// Apply a partial profile update and return the stored user
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The user does not exist
    /// - Database operation fails
    pub async fn update_user_profile(
        &self,
        user_id: i64,
        update: &UserProfileUpdate,
    ) -> AppResult<User> {
        let result = sqlx::query(
            r"
            UPDATE users SET
                first_name = COALESCE(?1, first_name),
                last_name = COALESCE(?2, last_name),
                phone = COALESCE(?3, phone),
                profile_image_url = COALESCE(?4, profile_image_url),
                updated_at = ?5,
                first_name_search = COALESCE(?7, first_name_search),
                last_name_search = COALESCE(?8, last_name_search)
            WHERE id = ?6
            ",
        )
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.phone)
        .bind(&update.profile_image_url)
        .bind(now_timestamp())
        .bind(user_id)
        .bind(update.first_name.as_deref().map(search_fold))
        .bind(update.last_name.as_deref().map(search_fold))
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to update user profile: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        self.get_user_required(user_id).await
    }

    /// Set or clear the profile picture URL
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The user does not exist
    /// - Database operation fails
    pub async fn set_profile_image_url(
        &self,
        user_id: i64,
        image_url: Option<&str>,
    ) -> AppResult<User> {
        let result = sqlx::query(
            "UPDATE users SET profile_image_url = ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(image_url)
        .bind(now_timestamp())
        .bind(user_id)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to update profile image: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        self.get_user_required(user_id).await
    }

    /// Change a user's role
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails
    pub async fn set_user_role(&self, user_id: i64, role: UserRole) -> AppResult<()> {
        sqlx::query("UPDATE users SET role = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(role.as_str())
            .bind(now_timestamp())
            .bind(user_id)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to update user role: {e}")))?;
        Ok(())
    }

    /// Activate or deactivate an account
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails
    pub async fn set_user_active(&self, user_id: i64, is_active: bool) -> AppResult<()> {
        sqlx::query("UPDATE users SET is_active = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(is_active)
            .bind(now_timestamp())
            .bind(user_id)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to update user status: {e}")))?;
        Ok(())
    }
}

/// Map a `users` row selected with [`USER_COLUMNS`]
pub(crate) fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let role: String = row.get("role");
    let last_login_at: Option<String> = row.get("last_login_at");
    let expires_at: Option<String> = row.get("email_verification_expires_at");
    let verified_at: Option<String> = row.get("email_verified_at");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        phone: row.get("phone"),
        role: UserRole::from_str_lossy(&role),
        profile_image_url: row.get("profile_image_url"),
        is_verified: row.get("is_verified"),
        is_active: row.get("is_active"),
        last_login_at: parse_optional_timestamp(last_login_at.as_deref())?,
        email_verification_token_hash: row.get("email_verification_token_hash"),
        email_verification_expires_at: parse_optional_timestamp(expires_at.as_deref())?,
        email_verified_at: parse_optional_timestamp(verified_at.as_deref())?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
