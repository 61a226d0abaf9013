// ABOUTME: Main library entry point for the Trainee fitness-trainer marketplace API
// ABOUTME: Accounts, trainer profiles, search, reviews, specializations and image uploads over REST
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # Trainee API
//!
//! REST backend for a marketplace connecting clients with fitness trainers.
//!
//! ## Architecture
//!
//! - **Core crate** (`trainee-core`): errors, response envelope, models, pagination
//! - **Database**: `SQLite` through `sqlx`, one manager per aggregate
//! - **Routes**: one axum router per domain, merged in [`server`]
//! - **Storage**: [`storage::ImageStore`] with S3 and in-memory backends
//! - **Email**: [`email::Mailer`] for verification messages
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use trainee_api::config::ServerConfig;
//! use trainee_api::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Trainee API configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Unified error type (re-exported from `trainee-core`)
pub use trainee_core::errors;

/// Domain models (re-exported from `trainee-core`)
pub use trainee_core::models;

/// Page/limit handling (re-exported from `trainee-core`)
pub use trainee_core::pagination;

/// Response envelope (re-exported from `trainee-core`)
pub use trainee_core::response;

/// JWT and password hashing
pub mod auth;

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// `SQLite` persistence
pub mod database;

/// Outgoing email
pub mod email;

/// Tracing subscriber setup
pub mod logging;

/// Request authentication
pub mod middleware;

/// Shared server state
pub mod resources;

/// HTTP routes
pub mod routes;

/// Router assembly and server loop
pub mod server;

/// Uploaded image storage
pub mod storage;

/// Field validators
pub mod validation;
