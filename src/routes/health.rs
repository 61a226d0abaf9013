// ABOUTME: Health check route reporting service version and database reachability
// ABOUTME: GET /health probes the database with SELECT 1
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tracing::warn;

use super::respond;
use crate::constants::service;
use crate::resources::ServerResources;

/// Overall health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Everything reachable
    Healthy,
    /// Database unreachable
    Unhealthy,
}

/// Database component status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    /// `SELECT 1` succeeded
    Connected,
    /// `SELECT 1` failed
    Disconnected,
}

/// Health check payload
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: HealthStatus,
    /// Service name
    pub service: &'static str,
    /// Crate version
    pub version: &'static str,
    /// Database status
    pub database: DatabaseStatus,
}

/// Health routes handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create health routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    /// Handle GET /health
    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Response {
        let (status, database, code) = match resources.database.ping().await {
            Ok(()) => (HealthStatus::Healthy, DatabaseStatus::Connected, StatusCode::OK),
            Err(e) => {
                warn!(error = %e, "Health check database probe failed");
                (
                    HealthStatus::Unhealthy,
                    DatabaseStatus::Disconnected,
                    StatusCode::SERVICE_UNAVAILABLE,
                )
            }
        };

        let body = HealthResponse {
            status,
            service: service::SERVICE_NAME,
            version: service::VERSION,
            database,
        };
        respond(code, "Service health", body)
    }
}
