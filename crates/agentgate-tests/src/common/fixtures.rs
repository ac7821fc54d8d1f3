// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Pre-built services, states and configuration documents.

use std::io::Write;
use std::sync::{Arc, OnceLock};

use agentgate_api::{ApiServer, AppState};
use agentgate_config::ApiConfig;
use agentgate_core::{
    store::demo_records, AuthService, CredentialStore, InMemoryCredentialStore, RbacPolicy,
    TokenConfig, TokenManager, UserRecord,
};
use axum::Router;
use tempfile::NamedTempFile;

/// Signing secret shared by the fixtures.
pub const TEST_SECRET: &str = "integration-test-secret-that-is-long-enough";

/// Token manager with default issuer and lifetime.
pub fn test_token_manager() -> TokenManager {
    TokenManager::new(TokenConfig::new(TEST_SECRET)).expect("valid token config")
}

/// The four reference accounts, hashed once per test binary.
pub fn cached_demo_records() -> Vec<UserRecord> {
    static RECORDS: OnceLock<Vec<UserRecord>> = OnceLock::new();
    RECORDS
        .get_or_init(|| demo_records().expect("demo records"))
        .clone()
}

/// Store holding the reference accounts.
pub fn demo_store() -> InMemoryCredentialStore {
    InMemoryCredentialStore::new(cached_demo_records()).expect("unique demo usernames")
}

/// Service over the given store with the default policy.
pub fn service_with_store(store: Arc<dyn CredentialStore>) -> AuthService {
    AuthService::new(store, RbacPolicy::default(), test_token_manager())
}

/// Service over the reference accounts.
pub fn demo_service() -> AuthService {
    service_with_store(Arc::new(demo_store()))
}

/// HTTP state over the reference accounts.
pub fn test_app_state() -> AppState {
    AppState::new(Arc::new(demo_service()), ApiConfig::default())
}

/// Fully layered router over the reference accounts.
pub fn test_router() -> Router {
    ApiServer::new(test_app_state()).router()
}

/// Writes `content` to a temp file with the given extension.
pub fn write_config(content: &str, extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("agentgate-")
        .suffix(&format!(".{}", extension))
        .tempfile()
        .expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

/// A YAML document exercising every section.
pub fn full_yaml(password_hash: &str) -> String {
    format!(
        r#"
auth:
  secret: "{secret}"
  issuer: agentgate-test
  token_ttl_secs: 600

roles:
  end_user: [execute_agent]

users:
  - username: alice
    email: alice@example.com
    roles: [developer, data_steward]
    password_hash: "{hash}"
  - username: bob
    email: bob@example.com
    roles: [end_user]
    password_hash: "{hash}"
    active: false

api:
  bind_address: 127.0.0.1
  port: 9090
  request_timeout_secs: 10

logging:
  level: debug
  format: json
"#,
        secret = TEST_SECRET,
        hash = password_hash
    )
}

/// Minimal TOML document.
pub fn minimal_toml() -> String {
    format!(
        "demo_users = true\n\n[auth]\nsecret = \"{}\"\n\n[api]\nport = 7070\n",
        TEST_SECRET
    )
}

/// Minimal JSON document.
pub fn minimal_json() -> String {
    serde_json::json!({
        "auth": { "secret": TEST_SECRET, "token_ttl_secs": 60 },
        "demo_users": true
    })
    .to_string()
}
