// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role to permission registry.
//!
//! [`RbacPolicy`] is created once at startup and shared across requests.
//! Holding [`Role::SuperAdmin`] grants every defined permission, whatever its
//! table entry says.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AuthError, AuthResult};
use crate::permission::{Permission, PermissionSet};
use crate::role::Role;

// =============================================================================
// RBAC Policy
// =============================================================================

/// Immutable role to permission mapping.
#[derive(Debug, Clone)]
pub struct RbacPolicy {
    role_permissions: Arc<HashMap<Role, PermissionSet>>,
}

impl RbacPolicy {
    /// Creates a policy with the default role table.
    pub fn new() -> Self {
        RbacPolicyBuilder::new().build()
    }

    /// Creates a policy builder seeded with the default table.
    pub fn builder() -> RbacPolicyBuilder {
        RbacPolicyBuilder::new()
    }

    /// Returns the table entry for a role.
    pub fn permissions_for(&self, role: Role) -> PermissionSet {
        self.role_permissions.get(&role).cloned().unwrap_or_default()
    }

    /// Resolves a set of roles to the permissions they grant.
    ///
    /// Super admins receive the full universe; otherwise the result is the
    /// union of each role's entry.
    pub fn effective_permissions(&self, roles: &[Role]) -> PermissionSet {
        if roles.iter().any(Role::is_super_admin) {
            return PermissionSet::universe();
        }

        let mut combined = PermissionSet::new();
        for role in roles {
            if let Some(perms) = self.role_permissions.get(role) {
                combined.merge(perms);
            }
        }
        combined
    }

    /// Returns `true` if the given roles grant the specified permission.
    pub fn has_permission(&self, roles: &[Role], permission: Permission) -> bool {
        if roles.iter().any(Role::is_super_admin) {
            return true;
        }
        roles.iter().any(|role| {
            self.role_permissions
                .get(role)
                .is_some_and(|perms| perms.contains(permission))
        })
    }

    /// Returns `true` if the given roles grant all the specified permissions.
    pub fn has_all_permissions(&self, roles: &[Role], permissions: &[Permission]) -> bool {
        self.effective_permissions(roles).contains_all(permissions)
    }

    /// Returns all roles present in the table, in declaration order.
    pub fn roles(&self) -> Vec<Role> {
        let mut roles: Vec<Role> = self.role_permissions.keys().copied().collect();
        roles.sort();
        roles
    }

    /// Checks that every defined role has a non-empty entry.
    pub fn validate(&self) -> AuthResult<()> {
        for role in Role::all() {
            match self.role_permissions.get(role) {
                Some(perms) if !perms.is_empty() => {}
                _ => {
                    return Err(AuthError::configuration(format!(
                        "role '{}' has no permissions",
                        role
                    )))
                }
            }
        }
        Ok(())
    }
}

impl Default for RbacPolicy {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// RBAC Policy Builder
// =============================================================================

/// Builder for constructing RBAC policies.
///
/// Starts from the default table; each override replaces a role's entry.
#[derive(Debug)]
pub struct RbacPolicyBuilder {
    role_permissions: HashMap<Role, PermissionSet>,
}

impl RbacPolicyBuilder {
    /// Creates a builder seeded with the default table.
    pub fn new() -> Self {
        let role_permissions = Role::all()
            .iter()
            .map(|role| {
                (
                    *role,
                    PermissionSet::from_permissions(role.default_permissions()),
                )
            })
            .collect();
        Self { role_permissions }
    }

    /// Creates a builder with no entries at all.
    pub fn empty() -> Self {
        Self {
            role_permissions: HashMap::new(),
        }
    }

    /// Replaces a role's entry.
    pub fn with_role(
        mut self,
        role: Role,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        self.role_permissions
            .insert(role, PermissionSet::from_permissions(permissions));
        self
    }

    /// Adds permissions to a role's existing entry.
    pub fn add_permissions(
        mut self,
        role: Role,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        let entry = self.role_permissions.entry(role).or_default();
        for perm in permissions {
            entry.add(perm);
        }
        self
    }

    /// Builds the policy without validation.
    pub fn build(self) -> RbacPolicy {
        RbacPolicy {
            role_permissions: Arc::new(self.role_permissions),
        }
    }

    /// Builds the policy and validates it.
    pub fn try_build(self) -> AuthResult<RbacPolicy> {
        let policy = self.build();
        policy.validate()?;
        Ok(policy)
    }
}

impl Default for RbacPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
