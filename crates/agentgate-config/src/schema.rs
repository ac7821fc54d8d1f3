// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions.
//!
//! # Schema Structure
//!
//! ```text
//! GateConfig
//! ├── auth: AuthConfig          signing secret, issuer, token lifetime
//! ├── roles: role -> [perm]     optional overrides of the default table
//! ├── users: Vec<UserConfig>    credential table
//! ├── demo_users: bool          seed the reference accounts
//! ├── api: ApiConfig
//! └── logging: LoggingConfig
//! ```

use std::collections::{BTreeMap, HashSet};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use agentgate_core::{
    password, store, AuthService, InMemoryCredentialStore, Permission, RbacPolicy, Role, TokenConfig,
    TokenManager, User, UserRecord,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Default token lifetime in seconds (15 minutes).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 900;

/// Default token issuer.
pub const DEFAULT_ISSUER: &str = "agentgate";

/// Default API port.
pub const DEFAULT_API_PORT: u16 = 8080;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Token signing configuration.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Role permission overrides keyed by role name.
    ///
    /// Roles not listed keep their default entry.
    #[serde(default)]
    pub roles: BTreeMap<String, Vec<Permission>>,

    /// Credential table.
    #[serde(default)]
    pub users: Vec<UserConfig>,

    /// Seed the four reference accounts (password `secret`).
    #[serde(default)]
    pub demo_users: bool,

    /// API server configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GateConfig {
    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.auth.validate()?;
        self.validate_roles()?;
        self.validate_users()?;
        self.api.validate()?;
        Ok(())
    }

    fn validate_roles(&self) -> ConfigResult<()> {
        for (name, permissions) in &self.roles {
            if Role::parse(name).is_none() {
                return Err(ConfigError::validation(
                    format!("roles.{}", name),
                    "unknown role",
                ));
            }
            if permissions.is_empty() {
                return Err(ConfigError::validation(
                    format!("roles.{}", name),
                    "must grant at least one permission",
                ));
            }
        }
        Ok(())
    }

    fn validate_users(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for (i, user) in self.users.iter().enumerate() {
            user.validate(i)?;
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigError::validation(
                    format!("users[{}].username", i),
                    format!("duplicate username '{}'", user.username),
                ));
            }
        }

        if self.users.is_empty() && !self.demo_users {
            warn!("No users configured; every login will fail");
        }
        Ok(())
    }

    // =========================================================================
    // Runtime Builders
    // =========================================================================

    /// Builds the token configuration.
    pub fn token_config(&self) -> ConfigResult<TokenConfig> {
        let secret = self
            .auth
            .secret
            .as_ref()
            .ok_or_else(|| ConfigError::validation("auth.secret", "is required"))?;

        Ok(TokenConfig::new(secret.expose())
            .with_issuer(self.auth.issuer.clone())
            .with_ttl(self.auth.token_ttl()?))
    }

    /// Builds the role registry, applying overrides to the default table.
    pub fn rbac_policy(&self) -> ConfigResult<RbacPolicy> {
        let mut builder = RbacPolicy::builder();
        for (name, permissions) in &self.roles {
            let role = Role::parse(name).ok_or_else(|| {
                ConfigError::validation(format!("roles.{}", name), "unknown role")
            })?;
            builder = builder.with_role(role, permissions.iter().copied());
        }
        Ok(builder.try_build()?)
    }

    /// Builds the credential store from the user table.
    ///
    /// With `demo_users` set, the reference accounts are added first.
    pub fn credential_store(&self) -> ConfigResult<InMemoryCredentialStore> {
        let mut records = if self.demo_users {
            store::demo_records()?
        } else {
            Vec::new()
        };
        records.extend(self.users.iter().map(UserConfig::to_record));

        Ok(InMemoryCredentialStore::new(records)?)
    }

    /// Builds the complete authentication service.
    pub fn auth_service(&self) -> ConfigResult<AuthService> {
        let tokens = TokenManager::new(self.token_config()?)?;
        let policy = self.rbac_policy()?;
        let store = self.credential_store()?;

        Ok(AuthService::new(Arc::new(store), policy, tokens))
    }
}

// =============================================================================
// Auth Configuration
// =============================================================================

/// Token signing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HMAC signing secret.
    #[serde(default)]
    pub secret: Option<SecretValue>,

    /// Token issuer.
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Token lifetime in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

fn default_issuer() -> String {
    DEFAULT_ISSUER.to_string()
}

fn default_token_ttl() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

impl AuthConfig {
    /// Validates the auth configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        match &self.secret {
            None => {
                return Err(ConfigError::validation("auth.secret", "is required"));
            }
            Some(secret) if secret.is_empty() => {
                return Err(ConfigError::validation("auth.secret", "cannot be empty"));
            }
            Some(secret) if secret.len() < agentgate_core::token::RECOMMENDED_SECRET_LEN => {
                warn!(
                    length = secret.len(),
                    "auth.secret is shorter than recommended ({} bytes)",
                    agentgate_core::token::RECOMMENDED_SECRET_LEN
                );
            }
            Some(_) => {}
        }

        if self.issuer.is_empty() {
            return Err(ConfigError::validation("auth.issuer", "cannot be empty"));
        }
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::validation("auth.token_ttl_secs", "cannot be zero"));
        }
        self.token_ttl()?;
        Ok(())
    }

    /// Returns the token lifetime.
    pub fn token_ttl(&self) -> ConfigResult<chrono::Duration> {
        i64::try_from(self.token_ttl_secs)
            .ok()
            .filter(|secs| *secs <= agentgate_core::token::MAX_TTL_SECS)
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| {
                ConfigError::validation(
                    "auth.token_ttl_secs",
                    format!(
                        "must not exceed {} seconds",
                        agentgate_core::token::MAX_TTL_SECS
                    ),
                )
            })
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            issuer: default_issuer(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

// =============================================================================
// User Configuration
// =============================================================================

/// A configured user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    /// Unique login name.
    pub username: String,

    /// Contact address.
    #[serde(default)]
    pub email: String,

    /// Assigned roles.
    pub roles: Vec<Role>,

    /// Argon2 PHC hash, as printed by `agentgate hash-password`.
    pub password_hash: SecretValue,

    /// Disabled accounts cannot log in.
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl UserConfig {
    /// Validates the user entry at position `index`.
    pub fn validate(&self, index: usize) -> ConfigResult<()> {
        if self.username.is_empty() {
            return Err(ConfigError::validation(
                format!("users[{}].username", index),
                "cannot be empty",
            ));
        }
        if self.roles.is_empty() {
            return Err(ConfigError::validation(
                format!("users[{}].roles", index),
                "must contain at least one role",
            ));
        }
        if !password::is_valid_hash(self.password_hash.expose()) {
            return Err(ConfigError::validation(
                format!("users[{}].password_hash", index),
                "is not a valid password hash",
            ));
        }
        Ok(())
    }

    /// Converts the entry to a credential record.
    pub fn to_record(&self) -> UserRecord {
        let user = User::new(self.username.clone(), self.roles.iter().copied())
            .with_email(self.email.clone())
            .with_active(self.active);
        UserRecord::new(user, self.password_hash.expose())
    }
}

// =============================================================================
// API Configuration
// =============================================================================

/// HTTP API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Bind address.
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,

    /// Listen port.
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_api_port() -> u16 {
    DEFAULT_API_PORT
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ApiConfig {
    /// Validates the API configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "api.request_timeout_secs",
                "cannot be zero",
            ));
        }
        Ok(())
    }

    /// Returns the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the socket address.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: DEFAULT_API_PORT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level, accepting `warning` as an alias.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON for log aggregation.
    Json,
    /// Minimal single-line output.
    Compact,
}

// =============================================================================
// Secret Value
// =============================================================================

/// A secret configuration value.
///
/// `Display` and `Debug` never print the contents.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(String);

impl SecretValue {
    /// Creates a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret in plain text.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "***")
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SecretValue").field(&"***").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "schema-test-secret-that-is-long-enough";

    fn base_config() -> GateConfig {
        GateConfig {
            auth: AuthConfig {
                secret: Some(SecretValue::new(SECRET)),
                ..Default::default()
            },
            demo_users: true,
            ..Default::default()
        }
    }

    fn user(username: &str, roles: Vec<Role>) -> UserConfig {
        UserConfig {
            username: username.to_string(),
            email: String::new(),
            roles,
            password_hash: SecretValue::new(password::hash("pw").unwrap()),
            active: true,
        }
    }

    #[test]
    fn test_gate_config_default() {
        let config = GateConfig::default();
        assert!(config.auth.secret.is_none());
        assert_eq!(config.auth.token_ttl_secs, 900);
        assert_eq!(config.auth.issuer, "agentgate");
        assert_eq!(config.api.port, 8080);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_config() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut config = base_config();
        config.auth.secret = Some(SecretValue::new(""));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "auth.secret"
        ));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = base_config();
        config.auth.token_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_ttl_rejected() {
        let mut config = base_config();
        config.auth.token_ttl_secs = 1_000_000_000_000_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "auth.token_ttl_secs"
        ));

        config.auth.token_ttl_secs = agentgate_core::token::MAX_TTL_SECS as u64;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_role_overrides() {
        let mut config = base_config();
        config
            .roles
            .insert("end_user".to_string(), vec![Permission::ExecuteAgent]);

        let policy = config.rbac_policy().unwrap();
        assert!(!policy.has_permission(&[Role::EndUser], Permission::ViewHistory));
        assert!(policy.has_permission(&[Role::Developer], Permission::ViewHistory));
    }

    #[test]
    fn test_unknown_role_override_rejected() {
        let mut config = base_config();
        config
            .roles
            .insert("auditor".to_string(), vec![Permission::AuditDataAccess]);
        assert!(config.validate().is_err());
        assert!(config.rbac_policy().is_err());
    }

    #[test]
    fn test_empty_role_override_rejected() {
        let mut config = base_config();
        config.roles.insert("developer".to_string(), vec![]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_user_validation() {
        let mut config = base_config();
        config.users.push(user("alice", vec![]));
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.users.push(user("alice", vec![Role::Developer]));
        config.users.push(user("alice", vec![Role::EndUser]));
        assert!(config.validate().is_err());

        let mut config = base_config();
        let mut bad_hash = user("alice", vec![Role::Developer]);
        bad_hash.password_hash = SecretValue::new("plaintext");
        config.users.push(bad_hash);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credential_store_with_demo_users() {
        let mut config = base_config();
        config.users.push(user("alice", vec![Role::Developer]));

        let store = config.credential_store().unwrap();
        assert_eq!(store.usernames(), vec!["admin", "alice", "data_steward", "developer", "user"]);
    }

    #[test]
    fn test_configured_user_clashing_with_demo_user() {
        let mut config = base_config();
        config.users.push(user("admin", vec![Role::EndUser]));
        assert!(matches!(config.credential_store(), Err(ConfigError::Auth(_))));
    }

    #[test]
    fn test_auth_service() {
        let config = base_config();
        let service = config.auth_service().unwrap();
        assert!(service.authenticate("user", "secret").is_ok());
        assert_eq!(service.tokens().ttl().num_seconds(), 900);
    }

    #[test]
    fn test_secret_value_redacted() {
        let secret = SecretValue::new("hunter2");
        assert_eq!(secret.to_string(), "***");
        assert!(!format!("{:?}", secret).contains("hunter2"));
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn test_log_level() {
        assert_eq!(LogLevel::Info.as_str(), "info");
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
    }
}
