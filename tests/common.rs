// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: In-memory database, recording mailer, in-memory image store and user factories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `trainee_api`
//!
//! Every test gets its own in-memory database, so tests never share state.

use std::env;
use std::sync::{Arc, Mutex, Once};

use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use trainee_api::config::{
    AuthConfig, DatabaseConfig, ServerConfig, StorageBackend, StorageConfig,
};
use trainee_api::database::Database;
use trainee_api::email::{EmailMessage, Mailer};
use trainee_api::errors::{AppError, AppResult};
use trainee_api::models::{
    NewSpecialization, NewUser, Specialization, TrainerProfile, TrainerProfileFields, User,
    UserRole,
};
use trainee_api::resources::ServerResources;
use trainee_api::server::build_app;
use trainee_api::storage::MemoryImageStore;

/// Password every factory user is created with
pub const TEST_PASSWORD: &str = "Password1";

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging once per process; `TEST_LOG` selects the level
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Mailer that keeps every message in memory
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl RecordingMailer {
    /// A mailer whose every delivery fails
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn messages_to(&self, address: &str) -> Vec<EmailMessage> {
        self.messages()
            .into_iter()
            .filter(|m| m.to == address)
            .collect()
    }

    /// Raw token from the latest verification link sent to `address`
    pub fn last_verification_token(&self, address: &str) -> Option<String> {
        self.messages_to(address).iter().rev().find_map(|m| {
            let start = m.body.find("token=")? + "token=".len();
            let rest = &m.body[start..];
            let end = rest.find('&').unwrap_or(rest.len());
            Some(rest[..end].to_owned())
        })
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        if self.fail {
            return Err(AppError::internal("SMTP relay unavailable"));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

/// Configuration for tests: in-memory database and storage, cheap bcrypt
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_owned(),
            max_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_owned(),
            jwt_expiry_hours: 1,
            bcrypt_cost: 4,
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
            bucket: "trainee-test".to_owned(),
            region: "eu-central-1".to_owned(),
        },
        ..ServerConfig::default()
    }
}

/// Everything a route test needs
pub struct TestContext {
    pub resources: Arc<ServerResources>,
    pub mailer: Arc<RecordingMailer>,
    pub store: Arc<MemoryImageStore>,
}

impl TestContext {
    /// The full application router, middleware included
    pub fn router(&self) -> Router {
        build_app(&self.resources)
    }

    pub fn database(&self) -> &Database {
        &self.resources.database
    }

    /// Token for `user`
    pub fn token_for(&self, user: &User) -> String {
        self.resources.auth_manager.generate_token(user).unwrap()
    }
}

pub async fn create_test_context() -> Result<TestContext> {
    create_test_context_with_mailer(RecordingMailer::default()).await
}

pub async fn create_test_context_with_mailer(mailer: RecordingMailer) -> Result<TestContext> {
    init_test_logging();

    let config = test_config();
    let database = Database::new(&config.database).await?;
    let store = Arc::new(MemoryImageStore::new(
        &config.storage.bucket,
        &config.storage.region,
    ));
    let mailer = Arc::new(mailer);

    let resources = Arc::new(ServerResources::new(
        database,
        Arc::new(config),
        store.clone(),
        mailer.clone(),
    ));

    Ok(TestContext {
        resources,
        mailer,
        store,
    })
}

/// Insert a user with [`TEST_PASSWORD`] and return it with a bearer token
pub async fn create_test_user(
    ctx: &TestContext,
    email: &str,
    role: UserRole,
) -> Result<(User, String)> {
    let password_hash = ctx
        .resources
        .auth_manager
        .hash_password(TEST_PASSWORD)
        .await?;
    let user = ctx
        .database()
        .create_user(&NewUser {
            email: email.to_owned(),
            password_hash,
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            phone: None,
            role,
        })
        .await?;
    let token = ctx.token_for(&user);
    Ok((user, token))
}

/// Insert a client user and give them a trainer profile
pub async fn create_test_trainer(
    ctx: &TestContext,
    email: &str,
    fields: TrainerProfileFields,
) -> Result<(User, String, TrainerProfile)> {
    let (user, _) = create_test_user(ctx, email, UserRole::Client).await?;
    let profile = ctx
        .database()
        .trainers()
        .create(user.id, &fields, &[])
        .await?;
    let user = ctx.database().get_user_required(user.id).await?;
    let token = ctx.token_for(&user);
    Ok((user, token, profile))
}

/// Insert an active specialization
pub async fn create_test_specialization(ctx: &TestContext, name: &str) -> Result<Specialization> {
    Ok(ctx
        .database()
        .specializations()
        .create(&NewSpecialization {
            name: name.to_owned(),
            description: Some(format!("{name} sessions")),
            icon_url: None,
            is_active: Some(true),
        })
        .await?)
}

/// Profile fields for a trainer in `city` charging `hourly_rate`
pub fn trainer_fields(city: &str, hourly_rate: f64) -> TrainerProfileFields {
    TrainerProfileFields {
        bio: Some(format!("Certified coach based in {city}")),
        experience_years: Some(5),
        hourly_rate: Some(hourly_rate),
        location_city: Some(city.to_owned()),
        location_country: Some("Romania".to_owned()),
        ..TrainerProfileFields::default()
    }
}
