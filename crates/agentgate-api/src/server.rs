// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;

use axum::{
    http::{header, Method, StatusCode, Uri},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The HTTP server exposing login and permission-guarded operations.
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.state.config.request_timeout(),
            ))
            .layer(create_cors_layer());

        Router::new()
            // Public
            .route("/health", get(handlers::health))
            // Authentication
            .route("/api/v1/auth/login", post(handlers::login))
            .route("/api/v1/auth/me", get(handlers::current_user))
            .route("/api/v1/auth/authorize", post(handlers::authorize))
            // Guarded operations
            .route("/api/v1/agents", post(handlers::create_agent))
            .route("/api/v1/agents/execute", post(handlers::execute_agent))
            .route("/api/v1/agents/{id}/publish", post(handlers::publish_agent))
            .route("/api/v1/history", get(handlers::view_history))
            .route("/api/v1/admin/users", get(handlers::list_users))
            .route("/api/v1/data/audit", get(handlers::audit_data_access))
            .fallback(route_not_found)
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server until the shutdown signal resolves.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.addr();
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        info!(addr = %addr, "Starting API server");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the configured listen address.
    pub fn addr(&self) -> SocketAddr {
        self.state.config.socket_addr()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("Route {}", uri.path()))
}

fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

// =============================================================================
// Tests
// =============================================================================
