// ABOUTME: Configuration module for the Trainee API server
// ABOUTME: Environment-driven server settings grouped by concern
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment variable parsing and typed configuration
pub mod environment;

pub use environment::{
    AuthConfig, CorsConfig, DatabaseConfig, EmailConfig, ServerConfig, SmtpConfig,
    SmtpEncryption, StorageBackend, StorageConfig,
};
