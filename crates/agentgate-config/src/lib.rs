// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # agentgate-config
//!
//! Configuration management for agentgate.
//!
//! ## Quick Start
//!
//! ```no_run
//! use agentgate_config::loader::load_config;
//!
//! let config = load_config("agentgate.yaml").unwrap();
//! let service = config.auth_service().unwrap();
//! ```
//!
//! ## Example File
//!
//! ```yaml
//! auth:
//!   secret: "${AGENTGATE_JWT_SECRET}"
//!   issuer: agentgate
//!   token_ttl_secs: 900
//!
//! roles:
//!   end_user: [execute_agent, view_history]
//!
//! users:
//!   - username: alice
//!     email: alice@example.com
//!     roles: [developer]
//!     password_hash: "$argon2id$v=19$..."
//!
//! api:
//!   port: 8080
//!
//! logging:
//!   level: info
//!   format: text
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader};
pub use schema::{
    ApiConfig, AuthConfig, GateConfig, LogFormat, LogLevel, LoggingConfig, SecretValue, UserConfig,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
