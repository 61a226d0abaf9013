// ABOUTME: Environment-based configuration for the Trainee API server
// ABOUTME: Reads HTTP, database, JWT, email, storage and CORS settings from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Server configuration
//!
//! Configuration comes exclusively from environment variables. Every value
//! except `JWT_SECRET` has a development default; [`ServerConfig::default`]
//! is what tests build on.

use std::env;
use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::constants::defaults;
use crate::errors::{AppError, AppResult};
use crate::logging::LoggingConfig;

/// Root configuration
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Database connection settings
    pub database: DatabaseConfig,
    /// JWT and password hashing
    pub auth: AuthConfig,
    /// Outgoing email
    pub email: EmailConfig,
    /// Image storage
    pub storage: StorageConfig,
    /// Cross-origin policy
    pub cors: CorsConfig,
    /// Log output
    pub logging: LoggingConfig,
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `sqlite:` URL; `sqlite::memory:` for an ephemeral database
    pub url: String,
    /// Pool size for file databases
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DATABASE_URL.to_owned(),
            max_connections: defaults::DATABASE_MAX_CONNECTIONS,
        }
    }
}

/// JWT and password hashing settings
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Token lifetime
    pub jwt_expiry_hours: i64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-only-jwt-secret".to_owned(),
            jwt_expiry_hours: defaults::JWT_EXPIRY_HOURS,
            bcrypt_cost: defaults::BCRYPT_ROUNDS,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

/// Outgoing email settings
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Sender address
    pub from_address: String,
    /// Base URL for links embedded in messages
    pub frontend_url: String,
    /// Verification token lifetime
    pub verification_ttl_hours: i64,
    /// SMTP relay; without one messages are only logged
    pub smtp: Option<SmtpConfig>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from_address: defaults::FROM_EMAIL.to_owned(),
            frontend_url: defaults::FRONTEND_URL.to_owned(),
            verification_ttl_hours: defaults::EMAIL_VERIFICATION_TTL_HOURS,
            smtp: None,
        }
    }
}

/// How the SMTP connection is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpEncryption {
    /// Plain connection upgraded with STARTTLS
    #[default]
    StartTls,
    /// TLS from the first byte
    Tls,
    /// Unencrypted, for local relays only
    None,
}

impl FromStr for SmtpEncryption {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "starttls" => Ok(Self::StartTls),
            "tls" => Ok(Self::Tls),
            "none" => Ok(Self::None),
            other => Err(AppError::config(format!(
                "Unknown SMTP_ENCRYPTION '{other}', expected 'starttls', 'tls' or 'none'"
            ))),
        }
    }
}

/// SMTP relay settings
#[derive(Clone)]
pub struct SmtpConfig {
    /// Relay host name
    pub host: String,
    /// Relay port
    pub port: u16,
    /// Login, if the relay requires one
    pub username: Option<String>,
    /// Password for `username`
    pub password: Option<String>,
    /// Transport security
    pub encryption: SmtpEncryption,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("encryption", &self.encryption)
            .finish()
    }
}

impl SmtpConfig {
    /// Read `SMTP_*` variables; `None` when `SMTP_HOST` is unset
    ///
    /// # Errors
    ///
    /// Returns a config error if `SMTP_PORT` or `SMTP_ENCRYPTION` is malformed
    pub fn from_env() -> AppResult<Option<Self>> {
        let Some(host) = non_empty_var("SMTP_HOST") else {
            warn!("SMTP_HOST not set, outgoing email is logged and not delivered");
            return Ok(None);
        };
        let encryption = match non_empty_var("SMTP_ENCRYPTION") {
            Some(raw) => raw.parse()?,
            None => SmtpEncryption::default(),
        };
        Ok(Some(Self {
            host,
            port: env_parse("SMTP_PORT", defaults::SMTP_PORT)?,
            username: non_empty_var("SMTP_USER"),
            password: non_empty_var("SMTP_PASSWORD"),
            encryption,
        }))
    }
}

/// Where uploaded images are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Amazon S3 bucket
    S3,
    /// Process memory, for development and tests
    #[default]
    Memory,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s3" => Ok(Self::S3),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::config(format!(
                "Unknown STORAGE_BACKEND '{other}', expected 's3' or 'memory'"
            ))),
        }
    }
}

/// Image storage settings
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Selected backend
    pub backend: StorageBackend,
    /// Bucket name (S3 only)
    pub bucket: String,
    /// AWS region, also used to build public URLs
    pub region: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            bucket: "trainee-images".to_owned(),
            region: "eu-central-1".to_owned(),
        }
    }
}

/// Cross-origin policy
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Allowed origins; empty means any origin
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns a config error if `JWT_SECRET` is missing or a numeric
    /// variable cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::config("JWT_SECRET must be set"))?;

        let backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::S3,
        };
        let storage_defaults = StorageConfig::default();
        let storage = StorageConfig {
            backend,
            bucket: env::var("AWS_S3_BUCKET").unwrap_or(storage_defaults.bucket),
            region: env::var("AWS_REGION").unwrap_or(storage_defaults.region),
        };
        if storage.backend == StorageBackend::S3 && env::var("AWS_S3_BUCKET").is_err() {
            warn!(bucket = %storage.bucket, "AWS_S3_BUCKET not set, using default bucket");
        }

        Ok(Self {
            http_port: env_parse("HTTP_PORT", defaults::HTTP_PORT)?,
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| defaults::DATABASE_URL.to_owned()),
                max_connections: env_parse(
                    "DATABASE_MAX_CONNECTIONS",
                    defaults::DATABASE_MAX_CONNECTIONS,
                )?,
            },
            auth: AuthConfig {
                jwt_secret,
                jwt_expiry_hours: env_parse("JWT_EXPIRY_HOURS", defaults::JWT_EXPIRY_HOURS)?,
                bcrypt_cost: env_parse("BCRYPT_ROUNDS", defaults::BCRYPT_ROUNDS)?,
            },
            email: EmailConfig {
                from_address: env::var("FROM_EMAIL")
                    .unwrap_or_else(|_| defaults::FROM_EMAIL.to_owned()),
                frontend_url: env::var("FRONTEND_URL")
                    .unwrap_or_else(|_| defaults::FRONTEND_URL.to_owned()),
                verification_ttl_hours: defaults::EMAIL_VERIFICATION_TTL_HOURS,
                smtp: SmtpConfig::from_env()?,
            },
            storage,
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .map(|raw| parse_origins(&raw))
                    .unwrap_or_default(),
            },
            logging: LoggingConfig::from_env(),
        })
    }

    /// Short human-readable summary for the startup log
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} database={} storage={:?} jwt_expiry_hours={} cors_origins={}",
            self.http_port,
            self.database.url,
            self.storage.backend,
            self.auth.jwt_expiry_hours,
            if self.cors.allowed_origins.is_empty() {
                "*".to_owned()
            } else {
                self.cors.allowed_origins.join(",")
            }
        )
    }
}

fn env_parse<T>(name: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid value for {name}: {e}"))),
        Err(_) => Ok(default),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
