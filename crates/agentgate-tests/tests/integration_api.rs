// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # API Integration Tests
//!
//! Requests go through the fully layered router with
//! `tower::ServiceExt::oneshot`.
//!
//! - `test_login_*`: token issuance
//! - `test_me_*`: current user
//! - `test_authorize_*`: decision queries
//! - `test_guard_*`: 401 versus 403 on guarded operations

use agentgate_core::DEMO_PASSWORD;
use agentgate_tests::common::*;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

// =============================================================================
// Helpers
// =============================================================================

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn login(router: &Router, username: &str, password: &str) -> String {
    let (status, _, body) = send(
        router,
        json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({ "username": username, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed for {}: {}", username, body);
    body["access_token"].as_str().unwrap().to_string()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let router = test_router();
    let (status, _, body) = send(&router, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_returns_bearer_token() {
    init_test_logging();
    let router = test_router();
    let (status, _, body) = send(
        &router,
        json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({ "username": "developer", "password": DEMO_PASSWORD }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["expires_in"], 900);
    assert!(body["access_token"].as_str().unwrap().split('.').count() == 3);
    assert!(body["expires_at"].is_string());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let router = test_router();

    let (unknown_status, unknown_headers, unknown_body) = send(
        &router,
        json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({ "username": "ghost", "password": DEMO_PASSWORD }),
        ),
    )
    .await;
    let (wrong_status, _, wrong_body) = send(
        &router,
        json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({ "username": "developer", "password": "nope" }),
        ),
    )
    .await;

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_body, wrong_body);
    assert_eq!(unknown_body["error"]["message"], "Incorrect username or password");
    assert_eq!(unknown_headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
}

#[tokio::test]
async fn test_login_empty_fields_are_401() {
    let router = test_router();
    let (status, headers, body) = send(
        &router,
        json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({ "username": "", "password": "" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    assert_eq!(body["error"]["message"], "Incorrect username or password");
}

#[tokio::test]
async fn test_login_malformed_body() {
    let router = test_router();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"username\":"))
        .unwrap();

    let (status, _, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// =============================================================================
// Current user
// =============================================================================

#[tokio::test]
async fn test_me_returns_account_and_token_permissions() {
    let router = test_router();
    let token = login(&router, "data_steward", DEMO_PASSWORD).await;

    let (status, _, body) = send(&router, get("/api/v1/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "data_steward");
    assert_eq!(body["roles"], json!(["data_steward"]));

    let permissions: Vec<&str> = body["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    assert!(permissions.contains(&"audit_data_access"));
    assert!(!permissions.contains(&"manage_users"));
}

#[tokio::test]
async fn test_me_without_token() {
    let router = test_router();
    let (status, headers, body) = send(&router, get("/api/v1/auth/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

// =============================================================================
// Decision queries
// =============================================================================

#[tokio::test]
async fn test_authorize_decisions() {
    let router = test_router();
    let token = login(&router, "developer", DEMO_PASSWORD).await;

    let (status, _, body) = send(
        &router,
        json_request(
            Method::POST,
            "/api/v1/auth/authorize",
            Some(&token),
            json!({ "permission": "create_agent" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "allowed": true, "reason": null }));

    let (_, _, body) = send(
        &router,
        json_request(
            Method::POST,
            "/api/v1/auth/authorize",
            Some(&token),
            json!({ "permission": "manage_users" }),
        ),
    )
    .await;
    assert_eq!(body, json!({ "allowed": false, "reason": "forbidden" }));

    let (_, _, body) = send(
        &router,
        json_request(
            Method::POST,
            "/api/v1/auth/authorize",
            Some("garbage"),
            json!({ "permission": "manage_users" }),
        ),
    )
    .await;
    assert_eq!(body, json!({ "allowed": false, "reason": "unauthenticated" }));
}

#[tokio::test]
async fn test_authorize_unknown_permission() {
    let router = test_router();
    let (status, _, _) = send(
        &router,
        json_request(
            Method::POST,
            "/api/v1/auth/authorize",
            None,
            json!({ "permission": "launch_missiles" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Guarded operations
// =============================================================================

#[tokio::test]
async fn test_guard_missing_and_invalid_tokens_are_401() {
    let router = test_router();

    for token in [None, Some("garbage"), Some("a.b.c")] {
        let (status, headers, _) = send(&router, get("/api/v1/history", token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "token {:?}", token);
        assert_eq!(headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    }
}

#[tokio::test]
async fn test_guard_expired_token_is_401() {
    let service = demo_service();
    let expired = service
        .issue_for("admin", Some(chrono::Duration::seconds(-1)))
        .unwrap();

    let router = test_router();
    let (status, _, _) = send(&router, get("/api/v1/admin/users", Some(&expired.access_token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_guard_insufficient_permission_is_403() {
    let router = test_router();
    let token = login(&router, "developer", DEMO_PASSWORD).await;

    let (status, headers, body) = send(&router, get("/api/v1/admin/users", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(headers.get(header::WWW_AUTHENTICATE).is_none());
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_guard_role_matrix() {
    let router = test_router();
    let agent_id = "0192f0c4-8d5e-7b3a-9c1f-2a4b6c8d0e1f";

    let user = login(&router, "user", DEMO_PASSWORD).await;
    let developer = login(&router, "developer", DEMO_PASSWORD).await;
    let steward = login(&router, "data_steward", DEMO_PASSWORD).await;
    let admin = login(&router, "admin", DEMO_PASSWORD).await;

    let execute = |token: &str| {
        json_request(
            Method::POST,
            "/api/v1/agents/execute",
            Some(token),
            json!({ "agent_id": agent_id, "input": { "prompt": "hi" } }),
        )
    };
    let create = |token: &str| {
        json_request(
            Method::POST,
            "/api/v1/agents",
            Some(token),
            json!({ "name": "summarizer" }),
        )
    };
    let publish = |token: &str| {
        json_request(
            Method::POST,
            &format!("/api/v1/agents/{}/publish", agent_id),
            Some(token),
            json!({}),
        )
    };

    assert_eq!(send(&router, execute(&user)).await.0, StatusCode::ACCEPTED);
    assert_eq!(send(&router, execute(&steward)).await.0, StatusCode::FORBIDDEN);
    assert_eq!(send(&router, get("/api/v1/history", Some(&steward))).await.0, StatusCode::OK);

    assert_eq!(send(&router, create(&user)).await.0, StatusCode::FORBIDDEN);
    let (status, _, body) = send(&router, create(&developer)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["owner"], "developer");

    assert_eq!(send(&router, publish(&developer)).await.0, StatusCode::FORBIDDEN);
    let (status, _, body) = send(&router, publish(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["published_by"], "admin");

    assert_eq!(
        send(&router, get("/api/v1/data/audit", Some(&developer))).await.0,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        send(&router, get("/api/v1/data/audit", Some(&steward))).await.0,
        StatusCode::OK
    );

    let (status, _, body) = send(&router, get("/api/v1/admin/users", Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 4);
}

#[tokio::test]
async fn test_guard_token_from_other_deployment_is_401() {
    let other = agentgate_core::TokenManager::new(agentgate_core::TokenConfig::new(
        "another-deployment-secret-long-enough",
    ))
    .unwrap();
    let foreign = other
        .issue("admin", &agentgate_core::PermissionSet::universe(), None)
        .unwrap();

    let router = test_router();
    let (status, _, _) = send(&router, get("/api/v1/admin/users", Some(&foreign.access_token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let router = test_router();
    let (status, _, body) = send(&router, get("/api/v1/agents/list", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "Route /api/v1/agents/list not found");
}
