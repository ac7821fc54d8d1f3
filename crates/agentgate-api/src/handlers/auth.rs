// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use agentgate_core::{AccessToken, Decision, DenyReason, Permission, Role};
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{BearerToken, OptionalBearerToken, ValidatedJson};
use crate::state::AppState;

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// POST /api/v1/auth/login
///
/// Verifies credentials and returns a bearer token. Empty fields fail like
/// any other bad credential.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AccessToken>> {
    // Password hashing is CPU bound.
    let service = state.auth_service.clone();
    let token = tokio::task::spawn_blocking(move || {
        service.authenticate(&request.username, &request.password)
    })
    .await
    .map_err(|e| ApiError::internal(format!("Login task failed: {}", e)))??;

    Ok(Json(token))
}

// =============================================================================
// Current User
// =============================================================================

/// Current user response.
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    /// Username.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Roles currently assigned in the store.
    pub roles: Vec<Role>,
    /// Permissions carried by the presented token.
    pub permissions: Vec<Permission>,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
}

/// GET /api/v1/auth/me
///
/// Returns the account behind the token and the permissions the token grants.
pub async fn current_user(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult<Json<CurrentUserResponse>> {
    let (user, claims) = state.auth().current_user(&token)?;

    Ok(Json(CurrentUserResponse {
        username: user.username,
        email: user.email,
        roles: user.roles,
        permissions: claims.permissions.iter().copied().collect(),
        expires_at: claims.expires_at,
    }))
}

// =============================================================================
// Authorize
// =============================================================================

/// Decision query body.
#[derive(Debug, Deserialize)]
pub struct AuthorizeRequest {
    /// Permission name, e.g. `"create_agent"`.
    pub permission: String,
}

/// Decision query response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorizeResponse {
    /// Whether the token grants the permission.
    pub allowed: bool,
    /// Why access was refused; `null` when allowed.
    pub reason: Option<String>,
}

impl From<&Decision> for AuthorizeResponse {
    fn from(decision: &Decision) -> Self {
        Self {
            allowed: decision.is_allowed(),
            reason: decision.deny_reason().map(|r| r.as_str().to_string()),
        }
    }
}

/// POST /api/v1/auth/authorize
///
/// Answers whether the presented token grants a permission. A missing or
/// invalid token is a `200` with reason `unauthenticated`.
pub async fn authorize(
    State(state): State<AppState>,
    OptionalBearerToken(token): OptionalBearerToken,
    ValidatedJson(request): ValidatedJson<AuthorizeRequest>,
) -> ApiResult<Json<AuthorizeResponse>> {
    let permission = Permission::parse(&request.permission)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown permission: {}", request.permission)))?;

    let decision = match token {
        Some(token) => state.auth().authorize(&token, permission),
        None => Decision::Deny(DenyReason::Unauthenticated),
    };

    Ok(Json(AuthorizeResponse::from(&decision)))
}

// =============================================================================
// Tests
// =============================================================================
