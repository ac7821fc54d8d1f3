// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token issuance and verification.

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::{debug, warn};

use super::claims::{AccessToken, Claims, TokenClaims};
use crate::error::{AuthError, AuthResult};
use crate::permission::PermissionSet;

/// Signing algorithm. Never taken from configuration or the token header.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Default issuer claim.
pub const DEFAULT_ISSUER: &str = "agentgate";

/// Default token lifetime in seconds (15 minutes).
pub const DEFAULT_TTL_SECS: i64 = 15 * 60;

/// Longest accepted token lifetime in seconds (one year).
pub const MAX_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Secrets shorter than this are accepted with a warning.
pub const RECOMMENDED_SECRET_LEN: usize = 32;

// =============================================================================
// TokenConfig
// =============================================================================

/// Settings for signing and verifying tokens.
#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC signing secret.
    pub secret: String,
    /// Value of the `iss` claim.
    pub issuer: String,
    /// Lifetime used when `issue` is given no explicit ttl.
    pub ttl: Duration,
}

impl TokenConfig {
    /// Creates a configuration with the given secret and default settings.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            ttl: Duration::seconds(DEFAULT_TTL_SECS),
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Sets the default lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AuthResult<()> {
        if self.secret.is_empty() {
            return Err(AuthError::configuration("token signing secret is not configured"));
        }
        if self.secret.len() < RECOMMENDED_SECRET_LEN {
            warn!(
                length = self.secret.len(),
                "Token signing secret is shorter than recommended ({} bytes)",
                RECOMMENDED_SECRET_LEN
            );
        }
        if self.issuer.is_empty() {
            return Err(AuthError::configuration("token issuer must not be empty"));
        }
        if self.ttl <= Duration::zero() {
            return Err(AuthError::configuration("token lifetime must be positive"));
        }
        if self.ttl > Duration::seconds(MAX_TTL_SECS) {
            return Err(AuthError::configuration(format!(
                "token lifetime must not exceed {} seconds",
                MAX_TTL_SECS
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

// =============================================================================
// TokenManager
// =============================================================================

/// Issues and verifies signed, time-limited tokens.
///
/// Stateless: a token stays valid until `exp`, there is no revocation.
#[derive(Clone)]
pub struct TokenManager {
    config: Arc<TokenConfig>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl TokenManager {
    /// Creates a manager with the given configuration.
    pub fn new(config: TokenConfig) -> AuthResult<Self> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(ALGORITHM);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.leeway = 0;
        validation.validate_aud = false;

        Ok(Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Issues a token for the user carrying the given permissions.
    ///
    /// `ttl` defaults to the configured lifetime. A negative ttl yields a
    /// token that is already expired.
    pub fn issue(
        &self,
        username: &str,
        permissions: &PermissionSet,
        ttl: Option<Duration>,
    ) -> AuthResult<AccessToken> {
        let ttl = ttl.unwrap_or(self.config.ttl);
        let now = Utc::now();
        let claims = Claims::new(
            username,
            permissions.clone(),
            self.config.issuer.as_str(),
            now,
            ttl.num_seconds(),
        );
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| AuthError::internal("token expiry out of range"))?;

        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::internal(format!("failed to sign token: {}", e)))?;

        debug!(
            username = %username,
            permissions = permissions.len(),
            expires_at = %expires_at,
            "Token issued"
        );

        Ok(AccessToken::bearer(token, claims.exp - claims.iat, expires_at))
    }

    /// Verifies a token and returns its claims.
    ///
    /// Any failure is [`AuthError::InvalidToken`]; the reason is logged at
    /// debug level only.
    pub fn verify(&self, token: &str) -> AuthResult<TokenClaims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::ExpiredSignature => "expired",
                ErrorKind::InvalidSignature => "bad signature",
                ErrorKind::InvalidAlgorithm => "algorithm mismatch",
                ErrorKind::InvalidIssuer => "issuer mismatch",
                ErrorKind::MissingRequiredClaim(_) => "missing required claim",
                ErrorKind::Json(_) => "malformed claims",
                _ => "malformed token",
            };
            debug!(reason, error = %e, "Token rejected");
            AuthError::invalid_token(reason)
        })?;

        TokenClaims::try_from(data.claims)
    }

    /// Returns the configured default lifetime.
    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Returns the configured issuer.
    pub fn issuer(&self) -> &str {
        &self.config.issuer
    }
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("issuer", &self.config.issuer)
            .field("algorithm", &ALGORITHM)
            .field("ttl_secs", &self.config.ttl.num_seconds())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
