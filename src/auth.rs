// ABOUTME: JWT issuance/validation and bcrypt password hashing
// ABOUTME: AuthManager signs HS256 tokens carrying user id, email and role
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Authentication primitives
//!
//! Tokens are HS256 JWTs with the user id in `sub`. Password hashing runs on
//! the blocking thread pool so bcrypt never stalls the async executor.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::task;

use crate::config::AuthConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{User, UserRole};

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// User email
    pub email: String,
    /// User role
    pub role: UserRole,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Numeric user id from `sub`
    ///
    /// # Errors
    ///
    /// Returns an invalid-token error if `sub` is not numeric
    pub fn user_id(&self) -> AppResult<i64> {
        self.sub
            .parse()
            .map_err(|_| AppError::auth_invalid("Invalid token."))
    }
}

/// Issues and validates tokens, hashes and checks passwords
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
    bcrypt_cost: u32,
}

impl AuthManager {
    /// Build from configuration
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_hours: config.jwt_expiry_hours,
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    /// Sign a token for `user`
    ///
    /// # Errors
    ///
    /// Returns an internal error if signing fails
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims
    ///
    /// # Errors
    ///
    /// Returns an internal error if signing fails
    pub fn sign(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Check signature and expiry
    ///
    /// # Errors
    ///
    /// Returns "Token expired." for expired tokens and "Invalid token." for
    /// anything else that fails validation
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::auth_expired(),
                _ => AppError::auth_invalid("Invalid token."),
            })
    }

    /// Hash a password with the configured bcrypt cost
    ///
    /// # Errors
    ///
    /// Returns an internal error if hashing fails
    pub async fn hash_password(&self, password: &str) -> AppResult<String> {
        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
    }

    /// Compare a password with a stored hash
    ///
    /// A malformed hash counts as a mismatch.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the blocking task panics
    pub async fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))
    }
}
