// ABOUTME: Application constants: limits, defaults, key prefixes and user-facing messages
// ABOUTME: Centralizes values shared between routes, services and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Service identity
pub mod service {
    /// Service name reported by the health endpoint
    pub const SERVICE_NAME: &str = "trainee-api";
    /// Crate version
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Default configuration values
pub mod defaults {
    /// HTTP port
    pub const HTTP_PORT: u16 = 8000;
    /// Database location
    pub const DATABASE_URL: &str = "sqlite:./trainee.db";
    /// Connection pool size for file databases
    pub const DATABASE_MAX_CONNECTIONS: u32 = 5;
    /// JWT lifetime (7 days)
    pub const JWT_EXPIRY_HOURS: i64 = 24 * 7;
    /// bcrypt work factor
    pub const BCRYPT_ROUNDS: u32 = 12;
    /// Sender address for outgoing email
    pub const FROM_EMAIL: &str = "noreply@trainee.com";
    /// SMTP submission port
    pub const SMTP_PORT: u16 = 587;
    /// Base URL used in verification links
    pub const FRONTEND_URL: &str = "http://localhost:8081";
    /// Email verification token lifetime
    pub const EMAIL_VERIFICATION_TTL_HOURS: i64 = 24;
    /// Request timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Request and upload limits
pub mod limits {
    /// Maximum profile picture size (5 MiB)
    pub const PROFILE_PICTURE_MAX_BYTES: usize = 5 * 1024 * 1024;
    /// Maximum gallery image size (10 MiB)
    pub const TRAINER_IMAGE_MAX_BYTES: usize = 10 * 1024 * 1024;
    /// Maximum number of gallery images per upload request
    pub const TRAINER_IMAGES_PER_REQUEST: usize = 5;
    /// Request body limit, large enough for a full gallery upload
    pub const MAX_REQUEST_BODY_BYTES: usize = TRAINER_IMAGE_MAX_BYTES * TRAINER_IMAGES_PER_REQUEST + 1024 * 1024;
    /// Name length bounds
    pub const NAME_MIN_CHARS: usize = 2;
    /// Name length bounds
    pub const NAME_MAX_CHARS: usize = 50;
    /// Minimum password length
    pub const PASSWORD_MIN_CHARS: usize = 6;
    /// Maximum password length (bcrypt truncates past 72 bytes)
    pub const PASSWORD_MAX_BYTES: usize = 72;
    /// Maximum specialization name length
    pub const SPECIALIZATION_NAME_MAX_CHARS: usize = 100;
    /// Maximum icon / image URL length
    pub const URL_MAX_CHARS: usize = 500;
    /// Maximum certification length
    pub const CERTIFICATION_MAX_CHARS: usize = 200;
}

/// Object storage key prefixes
pub mod storage_keys {
    /// Profile pictures
    pub const PROFILE_PICTURE_FOLDER: &str = "profilePicture";
    /// Trainer gallery images
    pub const TRAINER_IMAGES_FOLDER: &str = "trainer-images";
}

/// Multipart field names
pub mod form_fields {
    /// Profile picture upload field
    pub const PROFILE_IMAGE: &str = "profileImage";
    /// Gallery upload field
    pub const TRAINER_IMAGES: &str = "images";
}

/// User-facing messages
pub mod messages {
    /// Registration conflict
    pub const USER_ALREADY_EXISTS: &str = "User with this email already exists";
    /// Login failure (same message for unknown email and wrong password)
    pub const WRONG_CREDENTIALS: &str = "Wrong credentials";
    /// Token user missing or deactivated
    pub const USER_NOT_AUTHENTICATED: &str = "User not authenticated";
    /// Trainer lookup on review creation
    pub const TRAINER_DOES_NOT_EXIST: &str = "Trainer doesnt exist";
    /// Resend verification for an unknown or known address
    pub const VERIFICATION_RESEND_GENERIC: &str =
        "If an account with this email exists, a verification email has been sent";
}
