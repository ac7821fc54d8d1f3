// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Permission definitions for RBAC.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Operations a token holder may be allowed to perform.
///
/// The set is closed. Declaration order defines the ordering used by
/// [`PermissionSet`], which keeps serialized claims deterministic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // =========================================================================
    // Basic
    // =========================================================================
    /// Run a published agent.
    ExecuteAgent,
    /// View execution history.
    ViewHistory,

    // =========================================================================
    // Development
    // =========================================================================
    /// Create a new agent.
    CreateAgent,
    /// Edit an existing agent.
    EditAgent,
    /// Run an agent in a test sandbox.
    TestAgent,
    /// Submit an agent for approval.
    SubmitAgent,
    /// Read data sources available to agents.
    ReadData,

    // =========================================================================
    // Management
    // =========================================================================
    /// Approve a submitted agent.
    ApproveAgent,
    /// Publish an approved agent.
    PublishAgent,
    /// Create, update and disable users.
    ManageUsers,
    /// Change role assignments.
    ManageRoles,
    /// View system metrics and logs.
    MonitorSystem,
    /// Manage model backends.
    ManageModels,

    // =========================================================================
    // Data
    // =========================================================================
    /// Grant access to data sources.
    ManageDataAccess,
    /// Read the data access audit trail.
    AuditDataAccess,
    /// Revoke access to data sources.
    RevokeAccess,

    // =========================================================================
    // Super Admin
    // =========================================================================
    /// Marker permission held by super administrators.
    FullAccess,
}

/// Grouping of permissions for display and documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionCategory {
    /// Everyday use of published agents.
    Basic,
    /// Building and testing agents.
    Development,
    /// Platform administration.
    Management,
    /// Data governance.
    Data,
    /// Unrestricted access.
    SuperAdmin,
}

impl PermissionCategory {
    /// Returns the category name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionCategory::Basic => "basic",
            PermissionCategory::Development => "development",
            PermissionCategory::Management => "management",
            PermissionCategory::Data => "data",
            PermissionCategory::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for PermissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Permission {
    /// Returns the wire name of the permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ExecuteAgent => "execute_agent",
            Permission::ViewHistory => "view_history",
            Permission::CreateAgent => "create_agent",
            Permission::EditAgent => "edit_agent",
            Permission::TestAgent => "test_agent",
            Permission::SubmitAgent => "submit_agent",
            Permission::ReadData => "read_data",
            Permission::ApproveAgent => "approve_agent",
            Permission::PublishAgent => "publish_agent",
            Permission::ManageUsers => "manage_users",
            Permission::ManageRoles => "manage_roles",
            Permission::MonitorSystem => "monitor_system",
            Permission::ManageModels => "manage_models",
            Permission::ManageDataAccess => "manage_data_access",
            Permission::AuditDataAccess => "audit_data_access",
            Permission::RevokeAccess => "revoke_access",
            Permission::FullAccess => "full_access",
        }
    }

    /// Parses a permission from its wire name.
    ///
    /// Matching is exact; unknown names return `None`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.as_str() == s)
    }

    /// Returns every defined permission in declaration order.
    pub fn all() -> &'static [Permission] {
        &[
            Permission::ExecuteAgent,
            Permission::ViewHistory,
            Permission::CreateAgent,
            Permission::EditAgent,
            Permission::TestAgent,
            Permission::SubmitAgent,
            Permission::ReadData,
            Permission::ApproveAgent,
            Permission::PublishAgent,
            Permission::ManageUsers,
            Permission::ManageRoles,
            Permission::MonitorSystem,
            Permission::ManageModels,
            Permission::ManageDataAccess,
            Permission::AuditDataAccess,
            Permission::RevokeAccess,
            Permission::FullAccess,
        ]
    }

    /// Returns the category of this permission.
    pub fn category(&self) -> PermissionCategory {
        match self {
            Permission::ExecuteAgent | Permission::ViewHistory => PermissionCategory::Basic,
            Permission::CreateAgent
            | Permission::EditAgent
            | Permission::TestAgent
            | Permission::SubmitAgent
            | Permission::ReadData => PermissionCategory::Development,
            Permission::ApproveAgent
            | Permission::PublishAgent
            | Permission::ManageUsers
            | Permission::ManageRoles
            | Permission::MonitorSystem
            | Permission::ManageModels => PermissionCategory::Management,
            Permission::ManageDataAccess
            | Permission::AuditDataAccess
            | Permission::RevokeAccess => PermissionCategory::Data,
            Permission::FullAccess => PermissionCategory::SuperAdmin,
        }
    }

    /// Returns `true` for management and super admin permissions.
    pub fn is_admin(&self) -> bool {
        matches!(
            self.category(),
            PermissionCategory::Management | PermissionCategory::SuperAdmin
        )
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown permission '{}'", s))
    }
}

// =============================================================================
// Permission Set
// =============================================================================

/// An ordered set of permissions.
///
/// Serializes as a plain sorted list, e.g. `["execute_agent","view_history"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    permissions: BTreeSet<Permission>,
}

impl PermissionSet {
    /// Creates an empty permission set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set containing every defined permission.
    pub fn universe() -> Self {
        Self::from_permissions(Permission::all().iter().copied())
    }

    /// Creates a permission set from a list of permissions.
    pub fn from_permissions(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Adds a permission to the set.
    pub fn add(&mut self, permission: Permission) {
        self.permissions.insert(permission);
    }

    /// Returns `true` if the set contains the given permission.
    pub fn contains(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Returns `true` if the set contains all of the given permissions.
    pub fn contains_all(&self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.permissions.contains(p))
    }

    /// Returns `true` if the set contains any of the given permissions.
    pub fn contains_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.permissions.contains(p))
    }

    /// Returns the number of permissions in the set.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Returns an iterator over the permissions in order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    /// Merges another permission set into this one.
    pub fn merge(&mut self, other: &PermissionSet) {
        self.permissions.extend(other.permissions.iter().copied());
    }

    /// Returns the wire names of the permissions in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.permissions.iter().map(Permission::as_str).collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self::from_permissions(iter)
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a Permission;
    type IntoIter = std::collections::btree_set::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.permissions.iter()
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names().join(", "))
    }
}

// =============================================================================
// Tests
// =============================================================================
