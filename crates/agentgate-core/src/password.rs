// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Password hashing and verification.
//!
//! Hashes are Argon2id PHC strings with a per-hash random salt. Neither the
//! plaintext nor the stored hash ever appears in logs or errors.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::warn;

use crate::error::{AuthError, AuthResult};

/// Hashes a plaintext password with a fresh random salt.
pub fn hash(plaintext: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::internal(format!("password hashing failed: {}", e)))
}

/// Verifies a plaintext password against a stored PHC hash.
///
/// A malformed stored hash verifies as `false`.
pub fn verify(plaintext: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

/// Returns `true` if the string parses as a PHC hash.
pub fn is_valid_hash(stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash).is_ok()
}

/// Burns one verification against a fixed hash.
///
/// Used when the username is unknown so the failure takes as long as a
/// wrong password would.
pub fn verify_dummy(plaintext: &str) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let dummy = DUMMY_HASH.get_or_init(|| hash("agentgate-dummy-password").ok());
    if let Some(dummy) = dummy {
        let _ = verify(plaintext, dummy);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash("secret").unwrap();
        assert!(hashed.starts_with("$argon2id$"));
        assert!(verify("secret", &hashed));
        assert!(!verify("wrong", &hashed));
    }

    #[test]
    fn test_hash_is_salted() {
        let first = hash("secret").unwrap();
        let second = hash("secret").unwrap();
        assert_ne!(first, second);
        assert!(verify("secret", &first));
        assert!(verify("secret", &second));
    }

    #[test]
    fn test_malformed_hash_is_false() {
        assert!(!verify("secret", "not-a-hash"));
        assert!(!verify("secret", ""));
        assert!(!is_valid_hash("plaintext-password"));
    }

    #[test]
    fn test_verify_dummy_does_not_panic() {
        verify_dummy("anything");
        verify_dummy("");
    }
}
