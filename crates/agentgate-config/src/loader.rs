// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading.
//!
//! # Loading Pipeline
//!
//! 1. Read the file and pick the format from its extension
//! 2. Resolve `${VAR}` / `${VAR:default}` placeholders in the raw content
//! 3. Parse YAML, TOML or JSON into [`GateConfig`]
//! 4. Apply `AGENTGATE_*` environment overrides
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! AGENTGATE_JWT_SECRET=...
//! AGENTGATE_TOKEN_TTL_SECS=600
//! AGENTGATE_API_PORT=9090
//! AGENTGATE_LOG_LEVEL=debug
//! ```

use std::env;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{GateConfig, LogLevel, SecretValue};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "AGENTGATE";

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader.
///
/// ```no_run
/// use agentgate_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("agentgate.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve placeholders and apply environment overrides.
    resolve_env_vars: bool,
}

impl ConfigLoader {
    /// Creates a new configuration loader with default settings.
    pub fn new() -> Self {
        Self {
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            resolve_env_vars: true,
        }
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable handling.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Loads configuration from a file.
    ///
    /// The format is determined by the extension: `.yaml`/`.yml`, `.toml`
    /// or `.json`.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<GateConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = self.read_file(path)?;
        let format = ConfigFormat::from_path(path)?;

        let config = self.process(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<GateConfig> {
        self.process(content, format)
    }

    fn process(&self, content: &str, format: ConfigFormat) -> ConfigResult<GateConfig> {
        let mut config: GateConfig = if self.resolve_env_vars {
            parse_str(&self.resolve_env_placeholders(content), format)?
        } else {
            parse_str(content, format)?
        };

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        config.validate()?;

        debug!(
            users = config.users.len(),
            role_overrides = config.roles.len(),
            demo_users = config.demo_users,
            "Configuration validated"
        );
        Ok(config)
    }

    /// Reads file content.
    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    /// Resolves environment variable placeholders in content.
    ///
    /// Supports `${VAR_NAME}` and `${VAR_NAME:default}`. An unset variable
    /// without a default is left as written.
    fn resolve_env_placeholders(&self, content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find("${") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find('}') else {
                result.push_str(&rest[start..]);
                return result;
            };

            let inner = &after[..end];
            let (name, default) = match inner.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (inner, None),
            };

            match (env::var(name), default) {
                (Ok(value), _) => result.push_str(&value),
                (Err(_), Some(default)) => result.push_str(default),
                (Err(_), None) => {
                    warn!("Environment variable '{}' not found", name);
                    result.push_str(&rest[start..start + 2 + end + 1]);
                }
            }

            rest = &after[end + 1..];
        }

        result.push_str(rest);
        result
    }

    fn env_var(&self, suffix: &str) -> (String, Option<String>) {
        let name = format!("{}_{}", self.env_prefix, suffix);
        let value = env::var(&name).ok();
        (name, value)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&self, config: &mut GateConfig) -> ConfigResult<()> {
        if let (_, Some(value)) = self.env_var("JWT_SECRET") {
            config.auth.secret = Some(SecretValue::new(value));
        }

        if let (name, Some(value)) = self.env_var("TOKEN_TTL_SECS") {
            config.auth.token_ttl_secs = value
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name, "expected number of seconds"))?;
        }

        if let (name, Some(value)) = self.env_var("API_PORT") {
            config.api.port = value
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name, "expected valid port number"))?;
        }

        if let (name, Some(value)) = self.env_var("LOG_LEVEL") {
            config.logging.level = LogLevel::parse(&value)
                .ok_or_else(|| ConfigError::invalid_env_var(name, "expected log level"))?;
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> ConfigResult<T> {
    match format {
        ConfigFormat::Yaml => parse_yaml(content),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

/// YAML parsing through the `config` crate.
fn parse_yaml<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(|e| ConfigError::serialization(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::serialization(e.to_string()))
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<GateConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<GateConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const YAML: &str = r#"
auth:
  secret: loader-test-secret-that-is-long-enough
  issuer: agentgate-test
  token_ttl_secs: 600

roles:
  end_user: [execute_agent]

demo_users: true

api:
  port: 9000

logging:
  level: debug
"#;

    fn isolated_loader(prefix: &str) -> ConfigLoader {
        ConfigLoader::new().with_env_prefix(prefix)
    }

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let config = isolated_loader("AGT_LOADER_YAML").load(file.path()).unwrap();

        assert_eq!(config.auth.issuer, "agentgate-test");
        assert_eq!(config.auth.token_ttl_secs, 600);
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.demo_users);
        assert_eq!(config.roles["end_user"].len(), 1);
    }

    #[test]
    fn test_load_toml() {
        let toml = r#"
demo_users = true

[auth]
secret = "loader-test-secret-that-is-long-enough"

[api]
port = 7000
"#;
        let config = isolated_loader("AGT_LOADER_TOML")
            .load_from_str(toml, ConfigFormat::Toml)
            .unwrap();
        assert_eq!(config.api.port, 7000);
        assert_eq!(config.auth.token_ttl_secs, 900);
    }

    #[test]
    fn test_load_json() {
        let json = r#"{"auth": {"secret": "loader-test-secret-that-is-long-enough"}, "demo_users": true}"#;
        let config = isolated_loader("AGT_LOADER_JSON")
            .load_from_str(json, ConfigFormat::Json)
            .unwrap();
        assert!(config.demo_users);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"{"auth": {"secret": "s", "algorithm": "none"}}"#;
        let result = isolated_loader("AGT_LOADER_UNKNOWN").load_from_str(json, ConfigFormat::Json);
        assert!(matches!(result, Err(ConfigError::Serialization { .. })));
    }

    #[test]
    fn test_unknown_role_in_user_rejected() {
        let json = r#"{
            "auth": {"secret": "loader-test-secret-that-is-long-enough"},
            "users": [{"username": "x", "roles": ["root"], "password_hash": "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$aGFzaA"}]
        }"#;
        assert!(isolated_loader("AGT_LOADER_ROLE")
            .load_from_str(json, ConfigFormat::Json)
            .is_err());
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("agentgate.yaml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("agentgate.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("agentgate.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("agentgate.json")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_path(Path::new("agentgate.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("agentgate")).is_err());
    }

    #[test]
    fn test_env_placeholder_with_default() {
        let loader = ConfigLoader::new();
        let result = loader.resolve_env_placeholders("secret: ${AGT_SURELY_UNSET_VAR:fallback}");
        assert_eq!(result, "secret: fallback");
    }

    #[test]
    fn test_env_placeholder_set() {
        env::set_var("AGT_PLACEHOLDER_SET", "from-env");
        let loader = ConfigLoader::new();
        let result = loader.resolve_env_placeholders("a: ${AGT_PLACEHOLDER_SET:unused} b: x");
        assert_eq!(result, "a: from-env b: x");
    }

    #[test]
    fn test_env_placeholder_unset_without_default() {
        let loader = ConfigLoader::new();
        let input = "a: ${AGT_SURELY_UNSET_VAR} b: ${unterminated";
        assert_eq!(loader.resolve_env_placeholders(input), input);
    }

    #[test]
    fn test_env_overrides() {
        env::set_var("AGT_OVERRIDE_JWT_SECRET", "override-secret-that-is-long-enough!!");
        env::set_var("AGT_OVERRIDE_TOKEN_TTL_SECS", "120");
        env::set_var("AGT_OVERRIDE_API_PORT", "9443");
        env::set_var("AGT_OVERRIDE_LOG_LEVEL", "warn");

        let json = r#"{"demo_users": true}"#;
        let config = isolated_loader("AGT_OVERRIDE")
            .load_from_str(json, ConfigFormat::Json)
            .unwrap();

        assert_eq!(
            config.auth.secret.as_ref().map(SecretValue::expose),
            Some("override-secret-that-is-long-enough!!")
        );
        assert_eq!(config.auth.token_ttl_secs, 120);
        assert_eq!(config.api.port, 9443);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_invalid_env_override() {
        env::set_var("AGT_BADPORT_API_PORT", "not-a-port");
        let json = r#"{"auth": {"secret": "loader-test-secret-that-is-long-enough"}}"#;
        let result = isolated_loader("AGT_BADPORT").load_from_str(json, ConfigFormat::Json);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
    }

    #[test]
    fn test_env_disabled() {
        env::set_var("AGT_DISABLED_API_PORT", "1");
        let json = r#"{"auth": {"secret": "loader-test-secret-that-is-long-enough"}, "demo_users": true}"#;
        let config = isolated_loader("AGT_DISABLED")
            .with_env_vars(false)
            .load_from_str(json, ConfigFormat::Json)
            .unwrap();
        assert_eq!(config.api.port, 8080);
    }

    #[test]
    fn test_file_not_found() {
        let result = ConfigLoader::new().load("/nonexistent/path/agentgate.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_parse_error_carries_path() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(b"{ not json").unwrap();

        let result = isolated_loader("AGT_LOADER_PARSE").load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
