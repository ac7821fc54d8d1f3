// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # agentgate-core
//!
//! Role-based access control for the agent platform.
//!
//! ```text
//! credentials ──► CredentialStore + password::verify
//!                      │
//!                      ▼
//!                 RbacPolicy::effective_permissions
//!                      │
//!                      ▼
//!                 TokenManager::issue ──► signed token
//!                                              │
//!       request with token ──► Authorizer::authorize ──► Decision
//! ```
//!
//! Everything here is synchronous and immutable after construction, so an
//! [`AuthService`] can be shared across request handlers without locking.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod authz;
pub mod error;
pub mod password;
pub mod permission;
pub mod registry;
pub mod role;
pub mod service;
pub mod store;
pub mod token;
pub mod user;

pub use authz::{Authorizer, Decision, DenyReason};
pub use error::{AuthError, AuthResult};
pub use permission::{Permission, PermissionCategory, PermissionSet};
pub use registry::{RbacPolicy, RbacPolicyBuilder};
pub use role::Role;
pub use service::AuthService;
pub use store::{CredentialStore, InMemoryCredentialStore, DEMO_PASSWORD};
pub use token::{AccessToken, TokenClaims, TokenConfig, TokenManager};
pub use user::{User, UserRecord};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
