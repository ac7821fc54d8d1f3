// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authorization decisions.
//!
//! Decisions are made from the permission snapshot inside the token alone.
//! The [`Authorizer`] has no access to the credential store or registry, so a
//! role change takes effect only when the user obtains a new token.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{AuthError, AuthResult};
use crate::permission::Permission;
use crate::token::{TokenClaims, TokenManager};

// =============================================================================
// Decision
// =============================================================================

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The token failed verification.
    Unauthenticated,
    /// The token is valid but lacks the permission.
    Forbidden,
}

impl DenyReason {
    /// Returns the reason as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::Unauthenticated => "unauthenticated",
            DenyReason::Forbidden => "forbidden",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Access granted; carries the verified claims.
    Allow(TokenClaims),
    /// Access refused.
    Deny(DenyReason),
}

impl Decision {
    /// Returns `true` if access was granted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }

    /// Returns the deny reason, if any.
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Allow(_) => None,
            Decision::Deny(reason) => Some(*reason),
        }
    }

    /// Returns the claims of an allowed decision.
    pub fn claims(&self) -> Option<&TokenClaims> {
        match self {
            Decision::Allow(claims) => Some(claims),
            Decision::Deny(_) => None,
        }
    }
}

// =============================================================================
// Authorizer
// =============================================================================

/// Checks requested permissions against verified tokens.
#[derive(Debug, Clone)]
pub struct Authorizer {
    tokens: TokenManager,
}

impl Authorizer {
    /// Creates an authorizer that verifies tokens with the given manager.
    pub fn new(tokens: TokenManager) -> Self {
        Self { tokens }
    }

    /// Decides whether the token grants the required permission.
    pub fn authorize(&self, token: &str, required: Permission) -> Decision {
        match self.require(token, required) {
            Ok(claims) => Decision::Allow(claims),
            Err(AuthError::Forbidden { .. }) => Decision::Deny(DenyReason::Forbidden),
            Err(_) => Decision::Deny(DenyReason::Unauthenticated),
        }
    }

    /// Like [`authorize`](Self::authorize), but as a result for handlers.
    ///
    /// Fails with [`AuthError::InvalidToken`] or [`AuthError::Forbidden`].
    pub fn require(&self, token: &str, required: Permission) -> AuthResult<TokenClaims> {
        let claims = self.tokens.verify(token)?;

        if claims.has_permission(required) {
            Ok(claims)
        } else {
            debug!(
                username = %claims.username,
                permission = %required,
                "Permission denied"
            );
            Err(AuthError::forbidden(required))
        }
    }

    /// Returns the token manager used for verification.
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }
}

// =============================================================================
// Tests
// =============================================================================
