// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use agentgate_config::GateConfig;
use agentgate_core::{token::RECOMMENDED_SECRET_LEN, CredentialStore};

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Loads the configuration, builds the runtime objects and reports.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config = super::load_config(cli)?;
    let service = config.auth_service()?;
    let warnings = collect_warnings(&config);

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", cli.config.display());
            println!();
            println!("Summary:");
            println!("  Issuer:      {}", config.auth.issuer);
            println!("  Token TTL:   {}s", config.auth.token_ttl_secs);
            println!("  Users:       {}", service.store().len());
            println!("  Role overrides: {}", config.roles.len());
            println!("  API:         {}", config.api.socket_addr());
            println!("  Logging:     {} ({:?})", config.logging.level.as_str(), config.logging.format);

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": cli.config.display().to_string(),
                "summary": {
                    "issuer": config.auth.issuer,
                    "token_ttl_secs": config.auth.token_ttl_secs,
                    "user_count": service.store().len(),
                    "role_overrides": config.roles.keys().collect::<Vec<_>>(),
                    "api_address": config.api.socket_addr().to_string(),
                },
                "warnings": warnings,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).map_err(|e| BinError::runtime(e.to_string()))?
            );
        }
    }

    if args.strict && !warnings.is_empty() {
        return Err(BinError::config(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }

    Ok(())
}

/// Returns non-fatal findings about a valid configuration.
pub(crate) fn collect_warnings(config: &GateConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(secret) = &config.auth.secret {
        if secret.len() < RECOMMENDED_SECRET_LEN {
            warnings.push(format!(
                "Signing secret is {} bytes; at least {} recommended",
                secret.len(),
                RECOMMENDED_SECRET_LEN
            ));
        }
    }

    if config.demo_users {
        warnings.push("Demo accounts are enabled with a shared password".to_string());
    }

    if config.users.is_empty() && !config.demo_users {
        warnings.push("No users configured; every login will fail".to_string());
    }

    if config.api.bind_address.is_unspecified() {
        warnings.push(format!(
            "API listens on all interfaces ({})",
            config.api.bind_address
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentgate_config::{AuthConfig, SecretValue};

    #[test]
    fn test_collect_warnings() {
        let config = GateConfig {
            auth: AuthConfig {
                secret: Some(SecretValue::new("short")),
                ..Default::default()
            },
            ..Default::default()
        };

        let warnings = collect_warnings(&config);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("5 bytes"));
        assert!(warnings[1].contains("No users"));
    }

    #[test]
    fn test_demo_users_warning() {
        let config = GateConfig {
            auth: AuthConfig {
                secret: Some(SecretValue::new("a-secret-that-is-definitely-long-enough")),
                ..Default::default()
            },
            demo_users: true,
            ..Default::default()
        };

        let warnings = collect_warnings(&config);
        assert_eq!(warnings, vec!["Demo accounts are enabled with a shared password"]);
    }
}
