// ABOUTME: User account model and role enumeration
// ABOUTME: Password and verification token hashes never leave the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marketplace role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Books and reviews trainers
    #[default]
    Client,
    /// Owns a trainer profile
    Trainer,
    /// Platform operator
    Admin,
}

impl UserRole {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Trainer => "trainer",
            Self::Admin => "admin",
        }
    }

    /// Parse a role, returning `None` for unknown values
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "client" => Some(Self::Client),
            "trainer" => Some(Self::Trainer),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Parse from the database, falling back to `Client`
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Primary key
    pub id: i64,
    /// Normalized (lowercase) email address
    pub email: String,
    /// bcrypt hash of the password
    #[serde(skip)]
    pub password_hash: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Mobile phone number
    pub phone: Option<String>,
    /// Marketplace role
    pub role: UserRole,
    /// Public URL of the profile picture
    pub profile_image_url: Option<String>,
    /// Whether the email address has been verified
    pub is_verified: bool,
    /// Inactive users cannot log in
    pub is_active: bool,
    /// Last successful login
    pub last_login_at: Option<DateTime<Utc>>,
    /// SHA-256 of the pending email verification token
    #[serde(skip)]
    pub email_verification_token_hash: Option<String>,
    /// When the pending verification token stops being valid
    #[serde(skip)]
    pub email_verification_expires_at: Option<DateTime<Utc>>,
    /// When the email address was verified
    pub email_verified_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// "First Last"
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the user has an admin role
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    /// Public projection embedded in trainer and review payloads
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            profile_image_url: self.profile_image_url.clone(),
        }
    }
}

/// Public subset of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// User id
    pub id: i64,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Profile picture URL
    pub profile_image_url: Option<String>,
}

/// Fields accepted when creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Normalized email
    pub email: String,
    /// bcrypt hash
    pub password_hash: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Mobile phone number
    pub phone: Option<String>,
    /// Initial role
    pub role: UserRole,
}

/// Partial profile update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UserProfileUpdate {
    /// New given name
    pub first_name: Option<String>,
    /// New family name
    pub last_name: Option<String>,
    /// New phone number
    pub phone: Option<String>,
    /// New profile picture URL
    pub profile_image_url: Option<String>,
}
