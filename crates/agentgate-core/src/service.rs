// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication service: the entry points used by request handlers.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::authz::{Authorizer, Decision};
use crate::error::{AuthError, AuthResult};
use crate::password;
use crate::permission::{Permission, PermissionSet};
use crate::registry::RbacPolicy;
use crate::role::Role;
use crate::store::CredentialStore;
use crate::token::{AccessToken, TokenClaims, TokenManager};
use crate::user::{User, UserRecord};

/// Wires the credential store, registry and token manager together.
///
/// Immutable after construction; clone it or share it behind an `Arc`.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    policy: RbacPolicy,
    authorizer: Authorizer,
}

impl AuthService {
    /// Creates a service.
    pub fn new(store: Arc<dyn CredentialStore>, policy: RbacPolicy, tokens: TokenManager) -> Self {
        Self {
            store,
            policy,
            authorizer: Authorizer::new(tokens),
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Verifies a username and password and issues a token.
    ///
    /// Unknown usernames, wrong passwords and inactive accounts all fail
    /// with the same public message.
    pub fn authenticate(&self, username: &str, password: &str) -> AuthResult<AccessToken> {
        let record = self.check_credentials(username, password).inspect_err(|e| {
            warn!(username = %username, reason = e.error_type(), "Authentication failed");
        })?;

        let permissions = self.policy.effective_permissions(&record.user.roles);
        let token = self.tokens().issue(username, &permissions, None)?;

        info!(
            username = %username,
            roles = ?record.user.roles,
            "User authenticated"
        );
        Ok(token)
    }

    fn check_credentials(&self, username: &str, password: &str) -> AuthResult<UserRecord> {
        let Some(record) = self.store.find_user(username) else {
            password::verify_dummy(password);
            return Err(AuthError::NotFound);
        };

        if !password::verify(password, &record.password_hash) {
            return Err(AuthError::InvalidCredential);
        }
        if !record.user.active {
            return Err(AuthError::InactiveAccount);
        }
        Ok(record)
    }

    /// Issues a token for a stored user without checking a password.
    ///
    /// Meant for operator tooling; request handlers use
    /// [`authenticate`](Self::authenticate).
    pub fn issue_for(&self, username: &str, ttl: Option<Duration>) -> AuthResult<AccessToken> {
        let record = self.store.find_user(username).ok_or(AuthError::NotFound)?;
        if !record.user.active {
            return Err(AuthError::InactiveAccount);
        }

        let permissions = self.policy.effective_permissions(&record.user.roles);
        self.tokens().issue(username, &permissions, ttl)
    }

    // =========================================================================
    // Authorization
    // =========================================================================

    /// Decides whether the token grants the permission.
    pub fn authorize(&self, token: &str, permission: Permission) -> Decision {
        self.authorizer.authorize(token, permission)
    }

    /// Returns the claims if the token grants the permission.
    pub fn require(&self, token: &str, permission: Permission) -> AuthResult<TokenClaims> {
        self.authorizer.require(token, permission)
    }

    /// Verifies a token without requiring any permission.
    pub fn verify(&self, token: &str) -> AuthResult<TokenClaims> {
        self.tokens().verify(token)
    }

    /// Resolves the token subject to its stored account.
    ///
    /// Returns the account together with the verified claims. A subject that
    /// no longer exists is treated as an invalid token.
    pub fn current_user(&self, token: &str) -> AuthResult<(User, TokenClaims)> {
        let claims = self.verify(token)?;

        match self.store.find_user(&claims.username) {
            Some(record) => Ok((record.user, claims)),
            None => {
                debug!(username = %claims.username, "Token subject no longer exists");
                Err(AuthError::invalid_token("unknown subject"))
            }
        }
    }

    /// Resolves roles to their effective permissions.
    pub fn effective_permissions(&self, roles: &[Role]) -> PermissionSet {
        self.policy.effective_permissions(roles)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the registry.
    pub fn policy(&self) -> &RbacPolicy {
        &self.policy
    }

    /// Returns the token manager.
    pub fn tokens(&self) -> &TokenManager {
        self.authorizer.tokens()
    }

    /// Returns the credential store.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("users", &self.store.len())
            .field("policy", &self.policy)
            .field("tokens", self.tokens())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
