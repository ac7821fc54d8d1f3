// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Agent operations, each guarded by a single permission.
//!
//! | Endpoint | Permission |
//! |----------|------------|
//! | `POST /api/v1/agents/execute` | `execute_agent` |
//! | `GET /api/v1/history` | `view_history` |
//! | `POST /api/v1/agents` | `create_agent` |
//! | `POST /api/v1/agents/{id}/publish` | `publish_agent` |
//! | `GET /api/v1/admin/users` | `manage_users` |
//! | `GET /api/v1/data/audit` | `audit_data_access` |
//!
//! Authorization reads only the token, so none of these touch the credential
//! store except the user listing itself.

use agentgate_core::{CredentialStore, Permission};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{BearerToken, ValidatedJson};
use crate::state::AppState;

// =============================================================================
// Execute
// =============================================================================

/// Execution request body.
#[derive(Debug, Deserialize)]
pub struct ExecuteAgentRequest {
    /// Agent to run.
    pub agent_id: Uuid,
    /// Free-form input passed to the agent.
    #[serde(default)]
    pub input: serde_json::Value,
}

/// Accepted execution.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExecutionResponse {
    /// Execution identifier.
    pub execution_id: Uuid,
    /// Agent being run.
    pub agent_id: Uuid,
    /// Caller.
    pub requested_by: String,
    /// Always `"accepted"`.
    pub status: String,
}

/// POST /api/v1/agents/execute
pub async fn execute_agent(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    ValidatedJson(request): ValidatedJson<ExecuteAgentRequest>,
) -> ApiResult<(StatusCode, Json<ExecutionResponse>)> {
    let claims = state.auth().require(&token, Permission::ExecuteAgent)?;
    let execution_id = Uuid::now_v7();

    tracing::info!(
        username = %claims.username,
        agent_id = %request.agent_id,
        execution_id = %execution_id,
        "Agent execution accepted"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(ExecutionResponse {
            execution_id,
            agent_id: request.agent_id,
            requested_by: claims.username,
            status: "accepted".to_string(),
        }),
    ))
}

// =============================================================================
// History
// =============================================================================

/// Interaction history of the caller.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Owner of the history.
    pub username: String,
    /// Recorded interactions.
    pub entries: Vec<serde_json::Value>,
}

/// GET /api/v1/history
pub async fn view_history(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult<Json<HistoryResponse>> {
    let claims = state.auth().require(&token, Permission::ViewHistory)?;

    // No interaction log is kept yet.
    Ok(Json(HistoryResponse {
        username: claims.username,
        entries: Vec::new(),
    }))
}

// =============================================================================
// Create / Publish
// =============================================================================

/// Agent creation body.
#[derive(Debug, Deserialize)]
pub struct CreateAgentRequest {
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A created agent.
#[derive(Debug, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Agent identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creator.
    pub owner: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// POST /api/v1/agents
pub async fn create_agent(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    ValidatedJson(request): ValidatedJson<CreateAgentRequest>,
) -> ApiResult<(StatusCode, Json<AgentResponse>)> {
    let claims = state.auth().require(&token, Permission::CreateAgent)?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Agent name is required"));
    }

    let agent = AgentResponse {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: request.description,
        owner: claims.username,
        created_at: Utc::now(),
    };

    tracing::info!(agent_id = %agent.id, owner = %agent.owner, "Agent created");

    Ok((StatusCode::CREATED, Json(agent)))
}

/// Publication result.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublishResponse {
    /// Agent identifier.
    pub id: Uuid,
    /// Always `true`.
    pub published: bool,
    /// Publisher.
    pub published_by: String,
}

/// POST /api/v1/agents/{id}/publish
pub async fn publish_agent(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PublishResponse>> {
    let claims = state.auth().require(&token, Permission::PublishAgent)?;

    tracing::info!(agent_id = %id, username = %claims.username, "Agent published");

    Ok(Json(PublishResponse {
        id,
        published: true,
        published_by: claims.username,
    }))
}

// =============================================================================
// Administration
// =============================================================================

/// User directory summary.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    /// Number of accounts in the store.
    pub total: usize,
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult<Json<UserListResponse>> {
    state.auth().require(&token, Permission::ManageUsers)?;

    Ok(Json(UserListResponse {
        total: state.auth().store().len(),
    }))
}

/// Data access audit result.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataAuditResponse {
    /// Auditor.
    pub audited_by: String,
    /// When the audit ran.
    pub audited_at: DateTime<Utc>,
    /// Findings.
    pub findings: Vec<serde_json::Value>,
}

/// GET /api/v1/data/audit
pub async fn audit_data_access(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult<Json<DataAuditResponse>> {
    let claims = state.auth().require(&token, Permission::AuditDataAccess)?;

    Ok(Json(DataAuditResponse {
        audited_by: claims.username,
        audited_at: Utc::now(),
        findings: Vec::new(),
    }))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use agentgate_config::ApiConfig;
    use agentgate_core::{AuthService, InMemoryCredentialStore, RbacPolicy, TokenConfig, TokenManager};

    fn state() -> AppState {
        let tokens =
            TokenManager::new(TokenConfig::new("agents-test-secret-that-is-long-enough")).unwrap();
        let store = InMemoryCredentialStore::demo().unwrap();
        let service = AuthService::new(Arc::new(store), RbacPolicy::default(), tokens);
        AppState::new(Arc::new(service), ApiConfig::default())
    }

    fn token_for(state: &AppState, username: &str) -> BearerToken {
        BearerToken(state.auth().issue_for(username, None).unwrap().access_token)
    }

    #[tokio::test]
    async fn test_end_user_can_view_history() {
        let state = state();
        let token = token_for(&state, "user");
        let Json(history) = view_history(State(state), token).await.unwrap();
        assert_eq!(history.username, "user");
    }

    #[tokio::test]
    async fn test_developer_cannot_list_users() {
        let state = state();
        let token = token_for(&state, "developer");
        let err = list_users(State(state), token).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_admin_lists_users() {
        let state = state();
        let token = token_for(&state, "admin");
        let Json(users) = list_users(State(state), token).await.unwrap();
        assert_eq!(users.total, 4);
    }

    #[tokio::test]
    async fn test_create_agent_requires_name() {
        let state = state();
        let token = token_for(&state, "developer");
        let request = ValidatedJson(CreateAgentRequest {
            name: "  ".to_string(),
            description: None,
        });
        let err = create_agent(State(state), token, request).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let err = audit_data_access(State(state()), BearerToken("garbage".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
    }
}
