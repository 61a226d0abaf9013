// ABOUTME: Database operations for email verification tokens
// ABOUTME: Tokens are stored as SHA-256 hashes on the user row with an expiry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};

use super::{format_timestamp, now_timestamp, Database};
use crate::errors::{AppError, AppResult};

impl Database {
    /// Store a pending verification token, replacing any previous one
    ///
    /// The `token_hash` should be a SHA-256 hash of the raw token; the raw
    /// token only ever travels inside the verification email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails
    pub async fn store_email_verification_token(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE users SET
                email_verification_token_hash = ?1,
                email_verification_expires_at = ?2,
                updated_at = ?3
            WHERE id = ?4
            ",
        )
        .bind(token_hash)
        .bind(format_timestamp(expires_at))
        .bind(now_timestamp())
        .bind(user_id)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to store verification token: {e}")))?;
        Ok(())
    }

    /// Mark the email verified and clear the pending token
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails
    pub async fn mark_email_verified(&self, user_id: i64) -> AppResult<()> {
        let now = now_timestamp();
        sqlx::query(
            r"
            UPDATE users SET
                is_verified = 1,
                email_verified_at = ?1,
                email_verification_token_hash = NULL,
                email_verification_expires_at = NULL,
                updated_at = ?1
            WHERE id = ?2
            ",
        )
        .bind(&now)
        .bind(user_id)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to mark email verified: {e}")))?;
        Ok(())
    }
}
