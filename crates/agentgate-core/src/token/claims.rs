// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token claim structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::permission::{Permission, PermissionSet};

// =============================================================================
// Claims
// =============================================================================

/// Claims as they appear inside the signed token.
///
/// `permissions` is a snapshot taken at issuance; later role changes do not
/// affect tokens already handed out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username.
    pub sub: String,

    /// Effective permissions at issuance.
    pub permissions: PermissionSet,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at time (Unix timestamp).
    pub iat: i64,

    /// Issuer.
    pub iss: String,

    /// Token ID.
    pub jti: String,
}

impl Claims {
    /// Creates claims that expire `expires_in_secs` after `now`.
    pub fn new(
        username: impl Into<String>,
        permissions: PermissionSet,
        issuer: impl Into<String>,
        now: DateTime<Utc>,
        expires_in_secs: i64,
    ) -> Self {
        let iat = now.timestamp();

        Self {
            sub: username.into(),
            permissions,
            exp: iat.saturating_add(expires_in_secs),
            iat,
            iss: issuer.into(),
            jti: Uuid::now_v7().to_string(),
        }
    }

    /// Returns `true` if the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns the issued at time as a DateTime.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }
}

// =============================================================================
// TokenClaims
// =============================================================================

/// Verified identity and permissions extracted from a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenClaims {
    /// The authenticated username.
    pub username: String,
    /// Permissions granted at issuance.
    pub permissions: PermissionSet,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// Unique token identifier.
    pub token_id: String,
}

impl TokenClaims {
    /// Returns `true` if the token grants the permission.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }
}

impl TryFrom<Claims> for TokenClaims {
    type Error = AuthError;

    fn try_from(claims: Claims) -> AuthResult<Self> {
        if claims.sub.is_empty() {
            return Err(AuthError::invalid_token("empty subject"));
        }

        let expires_at = claims
            .expires_at()
            .ok_or_else(|| AuthError::invalid_token("exp out of range"))?;
        let issued_at = claims
            .issued_at()
            .ok_or_else(|| AuthError::invalid_token("iat out of range"))?;

        Ok(Self {
            username: claims.sub,
            permissions: claims.permissions,
            expires_at,
            issued_at,
            token_id: claims.jti,
        })
    }
}

// =============================================================================
// AccessToken
// =============================================================================

/// Token handed to a client after successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// The compact signed token.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
    /// Seconds until expiry at issuance.
    pub expires_in: i64,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Token type advertised to clients.
    pub const TOKEN_TYPE: &'static str = "bearer";

    /// Wraps a signed token.
    pub fn bearer(access_token: String, expires_in: i64, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token,
            token_type: Self::TOKEN_TYPE.to_string(),
            expires_in,
            expires_at,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
