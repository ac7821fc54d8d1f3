// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `check` command.
//!
//! Exits with status 0 on allow and 5 on deny, so it can gate scripts.

use agentgate_core::{AuthService, CredentialStore, Decision, Permission};

use crate::cli::{CheckArgs, Cli};
use crate::error::{BinError, BinResult};

/// Answers whether a token or a configured user holds a permission.
pub fn check(cli: &Cli, args: CheckArgs) -> BinResult<()> {
    let config = super::load_config(cli)?;
    let service = config.auth_service()?;
    let permission = parse_permission(&args.permission)?;

    let outcome = match (&args.token, &args.user) {
        (Some(token), _) => check_token(&service, token, permission),
        (None, Some(user)) => check_user(&service, user, permission)?,
        (None, None) => return Err(BinError::input("Either --token or --user is required")),
    };

    match outcome {
        Ok(subject) => {
            println!("allow: {} has {}", subject, permission);
            Ok(())
        }
        Err(reason) => {
            println!("deny: {}", reason);
            Err(BinError::Denied(reason))
        }
    }
}

fn parse_permission(name: &str) -> BinResult<Permission> {
    Permission::parse(name).ok_or_else(|| BinError::input(format!("Unknown permission: {}", name)))
}

/// `Ok(subject)` on allow, `Err(reason)` on deny.
fn check_token(service: &AuthService, token: &str, permission: Permission) -> Result<String, String> {
    match service.authorize(token, permission) {
        Decision::Allow(claims) => Ok(claims.username),
        Decision::Deny(reason) => Err(format!("{} ({})", reason, permission)),
    }
}

fn check_user(
    service: &AuthService,
    username: &str,
    permission: Permission,
) -> BinResult<Result<String, String>> {
    let record = service
        .store()
        .find_user(username)
        .ok_or_else(|| BinError::input(format!("Unknown user: {}", username)))?;

    let granted = service.effective_permissions(&record.user.roles);
    if !record.user.active {
        Ok(Err(format!("{} is inactive", username)))
    } else if granted.contains(permission) {
        Ok(Ok(username.to_string()))
    } else {
        Ok(Err(format!("{} lacks {}", username, permission)))
    }
}
