// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Credential storage.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{AuthError, AuthResult};
use crate::password;
use crate::role::Role;
use crate::user::{User, UserRecord};

/// Password given to every demo account.
pub const DEMO_PASSWORD: &str = "secret";

// =============================================================================
// CredentialStore
// =============================================================================

/// Read-only lookup of user records by username.
///
/// Matching is exact and case-sensitive. A missing username is `None`.
pub trait CredentialStore: Send + Sync {
    /// Returns the record for the username, if any.
    fn find_user(&self, username: &str) -> Option<UserRecord>;

    /// Returns the number of stored users.
    fn len(&self) -> usize;

    /// Returns `true` if the store holds no users.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: CredentialStore + ?Sized> CredentialStore for Arc<T> {
    fn find_user(&self, username: &str) -> Option<UserRecord> {
        (**self).find_user(username)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

// =============================================================================
// InMemoryCredentialStore
// =============================================================================

/// Credential store backed by a table loaded at startup.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    users: Arc<HashMap<String, UserRecord>>,
}

impl InMemoryCredentialStore {
    /// Creates a store from records.
    ///
    /// Fails on duplicate or empty usernames.
    pub fn new(records: impl IntoIterator<Item = UserRecord>) -> AuthResult<Self> {
        let mut users = HashMap::new();

        for record in records {
            let username = record.username().to_string();
            if username.is_empty() {
                return Err(AuthError::configuration("username must not be empty"));
            }
            if users.contains_key(&username) {
                return Err(AuthError::configuration(format!(
                    "duplicate username '{}'",
                    username
                )));
            }
            users.insert(username, record);
        }

        debug!(users = users.len(), "Credential store loaded");

        Ok(Self {
            users: Arc::new(users),
        })
    }

    /// Creates a store seeded with the four reference accounts.
    ///
    /// | username       | role           |
    /// |----------------|----------------|
    /// | `admin`        | `super_admin`  |
    /// | `developer`    | `developer`    |
    /// | `user`         | `end_user`     |
    /// | `data_steward` | `data_steward` |
    ///
    /// Every account uses [`DEMO_PASSWORD`], hashed here.
    pub fn demo() -> AuthResult<Self> {
        Self::new(demo_records()?)
    }

    /// Returns all usernames, sorted.
    pub fn usernames(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.users.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn find_user(&self, username: &str) -> Option<UserRecord> {
        self.users.get(username).cloned()
    }

    fn len(&self) -> usize {
        self.users.len()
    }
}

/// Builds the reference accounts with freshly hashed passwords.
pub fn demo_records() -> AuthResult<Vec<UserRecord>> {
    let accounts = [
        ("admin", "admin@agentgate.local", Role::SuperAdmin),
        ("developer", "developer@agentgate.local", Role::Developer),
        ("user", "user@agentgate.local", Role::EndUser),
        ("data_steward", "steward@agentgate.local", Role::DataSteward),
    ];

    accounts
        .into_iter()
        .map(|(username, email, role)| {
            let hash = password::hash(DEMO_PASSWORD)?;
            Ok(UserRecord::new(
                User::new(username, [role]).with_email(email),
                hash,
            ))
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(username: &str) -> UserRecord {
        UserRecord::new(User::new(username, [Role::EndUser]), "$argon2id$placeholder")
    }

    #[test]
    fn test_find_user_exact_match() {
        let store = InMemoryCredentialStore::new(vec![record("alice")]).unwrap();

        assert!(store.find_user("alice").is_some());
        assert!(store.find_user("Alice").is_none());
        assert!(store.find_user("alice ").is_none());
        assert!(store.find_user("ghost").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let result = InMemoryCredentialStore::new(vec![record("alice"), record("alice")]);
        assert!(matches!(result, Err(AuthError::Configuration { .. })));
    }

    #[test]
    fn test_empty_username_rejected() {
        assert!(InMemoryCredentialStore::new(vec![record("")]).is_err());
    }

    #[test]
    fn test_demo_store() {
        let store = InMemoryCredentialStore::demo().unwrap();
        assert_eq!(store.usernames(), vec!["admin", "data_steward", "developer", "user"]);

        let admin = store.find_user("admin").unwrap();
        assert_eq!(admin.user.roles, vec![Role::SuperAdmin]);
        assert!(password::verify(DEMO_PASSWORD, &admin.password_hash));
        assert!(!password::verify("wrong", &admin.password_hash));
    }

    #[test]
    fn test_arc_store_delegates() {
        let store: Arc<dyn CredentialStore> =
            Arc::new(InMemoryCredentialStore::new(vec![record("carol")]).unwrap());
        assert!(store.find_user("carol").is_some());
        assert!(!store.is_empty());
    }
}
