// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for authentication and authorization.
//!
//! # Error Taxonomy
//!
//! ```text
//! AuthError
//! ├── NotFound           - username absent from the credential store
//! ├── InvalidCredential  - password mismatch
//! ├── InactiveAccount    - account exists but is disabled
//! ├── InvalidToken       - malformed, tampered or expired token (401)
//! ├── Forbidden          - valid identity, missing permission (403)
//! ├── Configuration      - invalid policy or signing setup (startup)
//! └── Internal           - hashing or signing failure
//! ```
//!
//! The first three variants are *authentication failures*. They share one
//! public message so callers cannot tell which usernames exist.

use thiserror::Error;

use crate::permission::Permission;

/// Result type alias for authentication and authorization operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Public message shared by every authentication failure.
pub const AUTHENTICATION_FAILED_MESSAGE: &str = "Incorrect username or password";

/// Public message for any token that fails verification.
pub const INVALID_TOKEN_MESSAGE: &str = "Could not validate credentials";

// =============================================================================
// AuthError
// =============================================================================

/// Errors produced by the RBAC core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Username is not present in the credential store.
    #[error("{AUTHENTICATION_FAILED_MESSAGE}")]
    NotFound,

    /// Password did not match the stored hash.
    #[error("{AUTHENTICATION_FAILED_MESSAGE}")]
    InvalidCredential,

    /// Account exists but is not active.
    #[error("{AUTHENTICATION_FAILED_MESSAGE}")]
    InactiveAccount,

    /// Token is malformed, tampered, or expired.
    #[error("Invalid token: {reason}")]
    InvalidToken {
        /// Internal reason, for logging only.
        reason: String,
    },

    /// Token is valid but lacks the required permission.
    #[error("Permission denied: {permission} is required")]
    Forbidden {
        /// The permission that was required.
        permission: Permission,
    },

    /// Invalid configuration detected at startup.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message.
        message: String,
    },

    /// Hashing or signing failed.
    #[error("Internal error: {message}")]
    Internal {
        /// Error message (for logging, not user-facing).
        message: String,
    },
}

impl AuthError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates an invalid token error.
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Self::InvalidToken {
            reason: reason.into(),
        }
    }

    /// Creates a forbidden error.
    pub fn forbidden(permission: Permission) -> Self {
        Self::Forbidden { permission }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns `true` for failures of `authenticate`.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            AuthError::NotFound | AuthError::InvalidCredential | AuthError::InactiveAccount
        )
    }

    /// Returns `true` if the caller must obtain a new token (401-class).
    pub fn is_unauthenticated(&self) -> bool {
        self.is_authentication_failure() || matches!(self, AuthError::InvalidToken { .. })
    }

    /// Returns `true` if the caller is known but lacks access (403-class).
    pub fn is_forbidden(&self) -> bool {
        matches!(self, AuthError::Forbidden { .. })
    }

    /// Returns a message that is safe to show to the caller.
    ///
    /// Token failure reasons are collapsed into a single message.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::NotFound | AuthError::InvalidCredential | AuthError::InactiveAccount => {
                AUTHENTICATION_FAILED_MESSAGE.to_string()
            }
            AuthError::InvalidToken { .. } => INVALID_TOKEN_MESSAGE.to_string(),
            AuthError::Forbidden { permission } => {
                format!("Permission denied: {} is required", permission)
            }
            AuthError::Configuration { .. } | AuthError::Internal { .. } => {
                "Internal server error".to_string()
            }
        }
    }

    /// Returns the error type as a string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            AuthError::NotFound => "not_found",
            AuthError::InvalidCredential => "invalid_credential",
            AuthError::InactiveAccount => "inactive_account",
            AuthError::InvalidToken { .. } => "invalid_token",
            AuthError::Forbidden { .. } => "forbidden",
            AuthError::Configuration { .. } => "configuration",
            AuthError::Internal { .. } => "internal",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_failures_share_message() {
        let not_found = AuthError::NotFound;
        let wrong_password = AuthError::InvalidCredential;
        let inactive = AuthError::InactiveAccount;

        assert_eq!(not_found.to_string(), wrong_password.to_string());
        assert_eq!(not_found.public_message(), wrong_password.public_message());
        assert_eq!(inactive.public_message(), wrong_password.public_message());
        assert!(not_found.is_authentication_failure());
        assert!(wrong_password.is_unauthenticated());
    }

    #[test]
    fn test_invalid_token_hides_reason() {
        let error = AuthError::invalid_token("ExpiredSignature");
        assert!(error.to_string().contains("ExpiredSignature"));
        assert_eq!(error.public_message(), INVALID_TOKEN_MESSAGE);
        assert!(error.is_unauthenticated());
        assert!(!error.is_forbidden());
    }

    #[test]
    fn test_forbidden_is_distinct() {
        let error = AuthError::forbidden(Permission::ManageUsers);
        assert!(error.is_forbidden());
        assert!(!error.is_unauthenticated());
        assert!(error.public_message().contains("manage_users"));
        assert_eq!(error.error_type(), "forbidden");
    }
}
