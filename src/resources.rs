// ABOUTME: Shared server resources handed to every router as axum state
// ABOUTME: Database, auth manager and middleware, configuration, image store and email service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::email::{EmailService, Mailer};
use crate::middleware::AuthMiddleware;
use crate::storage::ImageStore;

/// Everything a request handler needs, created once at startup
#[derive(Clone)]
pub struct ServerResources {
    /// Database handle
    pub database: Arc<Database>,
    /// Token and password primitives
    pub auth_manager: Arc<AuthManager>,
    /// Request authentication
    pub auth_middleware: AuthMiddleware,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Uploaded image storage
    pub image_store: Arc<dyn ImageStore>,
    /// Account emails
    pub email: EmailService,
}

impl ServerResources {
    /// Wire the resources together
    #[must_use]
    pub fn new(
        database: Database,
        config: Arc<ServerConfig>,
        image_store: Arc<dyn ImageStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let database = Arc::new(database);
        let auth_manager = Arc::new(AuthManager::new(&config.auth));
        let auth_middleware = AuthMiddleware::new(auth_manager.clone(), database.clone());
        let email = EmailService::new(mailer, config.email.clone());

        Self {
            database,
            auth_manager,
            auth_middleware,
            config,
            image_store,
            email,
        }
    }
}
