// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use agentgate_config::{ApiConfig, GateConfig};
use agentgate_core::AuthService;
use axum::extract::FromRef;

use crate::error::ApiResult;

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Authentication and authorization entry points.
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    /// Creates state from an already built service.
    pub fn new(auth_service: Arc<AuthService>, config: ApiConfig) -> Self {
        Self {
            config: Arc::new(config),
            auth_service,
        }
    }

    /// Builds the service and state from a full configuration.
    pub fn from_config(config: &GateConfig) -> ApiResult<Self> {
        let service = config
            .auth_service()
            .map_err(|e| crate::error::ApiError::internal(e.to_string()))?;
        Ok(Self::new(Arc::new(service), config.api.clone()))
    }

    /// Returns the authentication service.
    pub fn auth(&self) -> &AuthService {
        &self.auth_service
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("auth_service", &self.auth_service)
            .finish()
    }
}

// =============================================================================
// FromRef implementations for extracting parts of state
// =============================================================================

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(state: &AppState) -> Self {
        state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<ApiConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
