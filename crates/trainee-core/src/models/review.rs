// ABOUTME: Client review model and review input validation
// ABOUTME: Ratings are integers 1..=5, review text is 10..=100 characters when present
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserSummary;
use crate::errors::FieldError;

/// Lowest accepted rating
pub const MIN_RATING: i64 = 1;
/// Highest accepted rating
pub const MAX_RATING: i64 = 5;
/// Minimum review text length in characters
pub const MIN_REVIEW_TEXT: usize = 10;
/// Maximum review text length in characters
pub const MAX_REVIEW_TEXT: usize = 100;

/// A client's review of a trainer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Primary key
    pub id: i64,
    /// Reviewed trainer profile
    pub trainer_id: i64,
    /// Author
    pub client_id: i64,
    /// 1..=5
    pub rating: i64,
    /// Optional text
    pub review_text: Option<String>,
    /// Set by moderation once the session is confirmed
    pub is_verified: bool,
    /// Flagged by a user
    pub is_reported: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Review joined with its author's public profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithClient {
    /// Review columns
    #[serde(flatten)]
    pub review: Review,
    /// Author
    pub client: UserSummary,
}

/// Review fields supplied by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    /// 1..=5
    pub rating: i64,
    /// Optional text
    pub review_text: Option<String>,
}

impl ReviewInput {
    /// Trim the text, treating blank text as absent
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            rating: self.rating,
            review_text: self
                .review_text
                .map(|t| t.trim().to_owned())
                .filter(|t| !t.is_empty()),
        }
    }

    /// Check rating and text bounds
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            errors.push(FieldError::new(
                "rating",
                format!("Rating must be an integer between {MIN_RATING} and {MAX_RATING}"),
            ));
        }
        if let Some(text) = &self.review_text {
            let len = text.chars().count();
            if !(MIN_REVIEW_TEXT..=MAX_REVIEW_TEXT).contains(&len) {
                errors.push(FieldError::new(
                    "reviewText",
                    format!(
                        "Review text must be between {MIN_REVIEW_TEXT} and {MAX_REVIEW_TEXT} characters"
                    ),
                ));
            }
        }
        errors
    }
}
