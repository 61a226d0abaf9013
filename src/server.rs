// ABOUTME: HTTP server assembly: merges domain routers and applies the tower-http middleware stack
// ABOUTME: Tracing, request ids, CORS, body limits, timeouts and graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware::map_response;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{info, warn, Level};

use crate::config::CorsConfig;
use crate::constants::{defaults, limits};
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;
use crate::routes::{
    AuthRoutes, EmailRoutes, HealthRoutes, ImageRoutes, ReviewRoutes, SpecializationRoutes,
    TrainerRoutes, TrainerSpecializationRoutes, UserRoutes,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Merge every domain router, without middleware
pub fn setup_router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(EmailRoutes::routes(resources.clone()))
        .merge(UserRoutes::routes(resources.clone()))
        .merge(TrainerRoutes::routes(resources.clone()))
        .merge(ReviewRoutes::routes(resources.clone()))
        .merge(SpecializationRoutes::routes(resources.clone()))
        .merge(TrainerSpecializationRoutes::routes(resources.clone()))
        .merge(ImageRoutes::routes(resources.clone()))
        .fallback(|| async { AppError::not_found("Route not found") })
}

/// Full application: routes plus the middleware stack
pub fn build_app(resources: &Arc<ServerResources>) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    // Layers run bottom-up: the last one added sees the request first
    setup_router(resources)
        .layer(DefaultBodyLimit::max(limits::MAX_REQUEST_BODY_BYTES))
        .layer(RequestBodyLimitLayer::new(limits::MAX_REQUEST_BODY_BYTES))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
        ))
        .layer(map_response(envelope_timeouts))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(setup_cors(&resources.config.cors))
}

/// Give the bare 408 produced by the timeout layer the failure envelope
async fn envelope_timeouts(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT
        && !response.headers().contains_key(header::CONTENT_TYPE)
    {
        return AppError::request_timeout().into_response();
    }
    response
}

/// CORS from configuration; an empty list or `*` allows any origin
fn setup_cors(config: &CorsConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]);

    if config.allowed_origins.is_empty() || config.allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Bind and serve until Ctrl-C
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails
pub async fn run_server(resources: Arc<ServerResources>, port: u16) -> AppResult<()> {
    let app = build_app(&resources);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!("HTTP server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
