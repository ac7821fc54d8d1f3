// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User accounts and their stored credentials.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

// =============================================================================
// User
// =============================================================================

/// A user account.
///
/// The username is the natural key and is matched case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Assigned roles.
    pub roles: Vec<Role>,
    /// Disabled accounts cannot authenticate.
    pub active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates an active user with the given roles.
    pub fn new(username: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: String::new(),
            roles: roles.into_iter().collect(),
            active: true,
            created_at: Utc::now(),
        }
    }

    /// Sets the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Returns `true` if the user holds the role.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

// =============================================================================
// UserRecord
// =============================================================================

/// A user together with their password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// The account.
    pub user: User,
    /// Argon2 PHC hash of the password.
    pub password_hash: String,
}

impl UserRecord {
    /// Creates a record from a user and an already computed hash.
    pub fn new(user: User, password_hash: impl Into<String>) -> Self {
        Self {
            user,
            password_hash: password_hash.into(),
        }
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.user.username
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("user", &self.user)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_builder() {
        let user = User::new("alice", [Role::Developer, Role::DataSteward])
            .with_email("alice@example.com")
            .with_active(false);

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert!(!user.active);
        assert!(user.has_role(Role::DataSteward));
        assert!(!user.has_role(Role::SuperAdmin));
    }

    #[test]
    fn test_record_debug_redacts_hash() {
        let record = UserRecord::new(User::new("bob", [Role::EndUser]), "$argon2id$v=19$abc");
        let debug = format!("{:?}", record);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("argon2id"));
        assert_eq!(record.username(), "bob");
    }
}
