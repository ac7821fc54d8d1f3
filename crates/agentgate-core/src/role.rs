// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role definitions and their default permission table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::permission::Permission;

/// Named bundles of permissions assigned to users.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Runs published agents and views their history.
    EndUser,
    /// Builds, tests and submits agents.
    Developer,
    /// Approves and publishes agents, manages users and models.
    Administrator,
    /// Governs data access.
    DataSteward,
    /// Unrestricted access to every permission.
    SuperAdmin,
}

impl Role {
    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::EndUser => "end_user",
            Role::Developer => "developer",
            Role::Administrator => "administrator",
            Role::DataSteward => "data_steward",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Parses a role from its wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "end_user" => Some(Role::EndUser),
            "developer" => Some(Role::Developer),
            "administrator" => Some(Role::Administrator),
            "data_steward" => Some(Role::DataSteward),
            "super_admin" => Some(Role::SuperAdmin),
            _ => None,
        }
    }

    /// Returns all defined roles.
    pub fn all() -> &'static [Role] {
        &[
            Role::EndUser,
            Role::Developer,
            Role::Administrator,
            Role::DataSteward,
            Role::SuperAdmin,
        ]
    }

    /// Returns `true` if holding this role grants every permission.
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    /// Returns the default table entry for this role.
    ///
    /// For [`Role::SuperAdmin`] this is only the marker entry; the registry
    /// expands it to the full permission universe.
    pub fn default_permissions(&self) -> Vec<Permission> {
        const END_USER: &[Permission] = &[Permission::ExecuteAgent, Permission::ViewHistory];
        const DEVELOPER: &[Permission] = &[
            Permission::CreateAgent,
            Permission::EditAgent,
            Permission::TestAgent,
            Permission::SubmitAgent,
            Permission::ReadData,
        ];
        const ADMINISTRATOR: &[Permission] = &[
            Permission::ApproveAgent,
            Permission::PublishAgent,
            Permission::ManageUsers,
            Permission::ManageRoles,
            Permission::MonitorSystem,
            Permission::ManageModels,
        ];

        match self {
            Role::EndUser => END_USER.to_vec(),
            Role::Developer => [END_USER, DEVELOPER].concat(),
            Role::Administrator => [END_USER, DEVELOPER, ADMINISTRATOR].concat(),
            Role::DataSteward => vec![
                Permission::ManageDataAccess,
                Permission::AuditDataAccess,
                Permission::RevokeAccess,
                Permission::ViewHistory,
            ],
            Role::SuperAdmin => vec![Permission::FullAccess],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown role '{}'", s))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("end_user"), Some(Role::EndUser));
        assert_eq!(Role::parse("super_admin"), Some(Role::SuperAdmin));
        assert_eq!(Role::parse("Developer"), None);
        assert_eq!(Role::parse("root"), None);
        assert!("data_steward".parse::<Role>().is_ok());
        assert!("guest".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_names() {
        for role in Role::all() {
            let json = serde_json::to_string(role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }

    #[test]
    fn test_default_permissions_are_cumulative() {
        let end_user = Role::EndUser.default_permissions();
        let developer = Role::Developer.default_permissions();
        let administrator = Role::Administrator.default_permissions();

        assert_eq!(end_user.len(), 2);
        assert_eq!(developer.len(), 7);
        assert_eq!(administrator.len(), 13);
        assert!(end_user.iter().all(|p| developer.contains(p)));
        assert!(developer.iter().all(|p| administrator.contains(p)));
        assert!(!administrator.contains(&Permission::ManageDataAccess));
    }

    #[test]
    fn test_data_steward_permissions() {
        let steward = Role::DataSteward.default_permissions();
        assert_eq!(steward.len(), 4);
        assert!(steward.contains(&Permission::AuditDataAccess));
        assert!(steward.contains(&Permission::ViewHistory));
        assert!(!steward.contains(&Permission::ExecuteAgent));
    }

    #[test]
    fn test_super_admin_entry_is_marker() {
        assert_eq!(
            Role::SuperAdmin.default_permissions(),
            vec![Permission::FullAccess]
        );
        assert!(Role::SuperAdmin.is_super_admin());
        assert!(!Role::Administrator.is_super_admin());
    }
}
