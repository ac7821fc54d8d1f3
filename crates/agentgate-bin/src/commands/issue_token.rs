// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `issue-token` command.

use agentgate_core::{token::MAX_TTL_SECS, AccessToken};
use chrono::Duration;
use tracing::info;

use crate::cli::{Cli, IssueTokenArgs, OutputFormat};
use crate::error::{BinError, BinResult};

/// Issues a token for a configured user and prints it.
pub fn issue_token(cli: &Cli, args: IssueTokenArgs) -> BinResult<()> {
    let config = super::load_config(cli)?;
    let service = config.auth_service()?;
    let ttl = args.ttl_secs.map(parse_ttl).transpose()?;

    let token = service.issue_for(&args.username, ttl)?;
    info!(username = %args.username, expires_at = %token.expires_at, "Token issued");

    print_token(&token, args.format)
}

fn parse_ttl(secs: i64) -> BinResult<Duration> {
    if secs <= 0 {
        return Err(BinError::input("--ttl-secs must be positive"));
    }
    if secs > MAX_TTL_SECS {
        return Err(BinError::input(format!(
            "--ttl-secs must not exceed {}",
            MAX_TTL_SECS
        )));
    }
    Duration::try_seconds(secs).ok_or_else(|| BinError::input("--ttl-secs is out of range"))
}

fn print_token(token: &AccessToken, format: OutputFormat) -> BinResult<()> {
    match format {
        OutputFormat::Text => println!("{}", token.access_token),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(token).map_err(|e| BinError::runtime(e.to_string()))?
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ttl() {
        assert_eq!(parse_ttl(60).unwrap(), Duration::seconds(60));
        assert!(parse_ttl(0).is_err());
        assert!(parse_ttl(-1).is_err());
        assert!(matches!(parse_ttl(i64::MAX), Err(BinError::Input(_))));
        assert!(matches!(parse_ttl(1_000_000_000_000_000), Err(BinError::Input(_))));
        assert_eq!(parse_ttl(MAX_TTL_SECS).unwrap(), Duration::seconds(MAX_TTL_SECS));
    }
}
