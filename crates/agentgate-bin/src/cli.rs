// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `serve`: start the HTTP server (default)
//! - `validate`: validate the configuration file
//! - `hash-password`: produce a password hash for the user table
//! - `issue-token`: mint a token for a configured user
//! - `check`: answer a permission question for a token or user
//! - `version`: show version information

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// agentgate - role-based access control for AI agent platforms
///
/// Authenticates users, issues signed bearer tokens and decides whether a
/// token grants a permission.
#[derive(Parser, Debug)]
#[command(
    name = "agentgate",
    author = "Sylvex <contact@sylvex.io>",
    version = agentgate_core::VERSION,
    about = "Role-based access control for AI agent platforms",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "agentgate.yaml",
        env = "AGENTGATE_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error); defaults to the config file
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Log format; defaults to the config file
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP server
    ///
    /// This is the default command when no subcommand is specified.
    Serve(ServeArgs),

    /// Validate the configuration file
    ///
    /// Loads the file, applies environment overrides and builds the runtime
    /// objects without starting the server.
    Validate(ValidateArgs),

    /// Hash a password for the `users` table
    #[command(name = "hash-password")]
    HashPassword(HashPasswordArgs),

    /// Issue a token for a configured user without a password
    #[command(name = "issue-token")]
    IssueToken(IssueTokenArgs),

    /// Check whether a token or user holds a permission
    Check(CheckArgs),

    /// Show version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `serve` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Override the bind address
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `hash-password` command.
#[derive(Args, Debug, Clone)]
pub struct HashPasswordArgs {
    /// Password to hash
    #[arg(required_unless_present = "stdin")]
    pub password: Option<String>,

    /// Read the password from stdin
    #[arg(long)]
    pub stdin: bool,
}

/// Arguments for the `issue-token` command.
#[derive(Args, Debug, Clone)]
pub struct IssueTokenArgs {
    /// User to issue the token for
    pub username: String,

    /// Lifetime in seconds; defaults to the configured lifetime
    #[arg(long)]
    pub ttl_secs: Option<i64>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `check` command.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Permission name, e.g. `manage_users`
    pub permission: String,

    /// Token to check
    #[arg(short, long, required_unless_present = "user", conflicts_with = "user")]
    pub token: Option<String>,

    /// Configured user whose roles are checked
    #[arg(short, long)]
    pub user: Option<String>,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<agentgate_config::LogFormat> for LogFormat {
    fn from(format: agentgate_config::LogFormat) -> Self {
        match format {
            agentgate_config::LogFormat::Text => LogFormat::Text,
            agentgate_config::LogFormat::Json => LogFormat::Json,
            agentgate_config::LogFormat::Compact => LogFormat::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the command to run, defaulting to `serve`.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Serve(ServeArgs::default()))
    }

    /// Returns the log level forced by flags, if any.
    ///
    /// `--quiet` wins over `--verbose`, which wins over `--log-level`.
    pub fn forced_log_level(&self) -> Option<&str> {
        if self.quiet {
            Some("warn")
        } else if self.verbose {
            Some("debug")
        } else {
            self.log_level.as_deref()
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
    fn test_default_command() {
        let cli = Cli::parse_from(["agentgate"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.effective_command(), Commands::Serve(_)));
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from(["agentgate", "serve", "--port", "9000", "--bind", "0.0.0.0"]);
        let Some(Commands::Serve(args)) = cli.command else {
            panic!("Expected Serve command");
        };
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.bind, Some("0.0.0.0".parse().unwrap()));
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["agentgate", "-c", "/etc/agentgate/config.yaml", "version"]);
        assert_eq!(cli.config, PathBuf::from("/etc/agentgate/config.yaml"));
        assert!(matches!(cli.command, Some(Commands::Version)));
    }

    #[test]
    fn test_log_level_flags() {
        let cli = Cli::parse_from(["agentgate", "-l", "trace"]);
        assert_eq!(cli.forced_log_level(), Some("trace"));

        let cli = Cli::parse_from(["agentgate", "-v", "-l", "trace"]);
        assert_eq!(cli.forced_log_level(), Some("debug"));

        let cli = Cli::parse_from(["agentgate", "-q", "-v"]);
        assert_eq!(cli.forced_log_level(), Some("warn"));

        let cli = Cli::parse_from(["agentgate"]);
        assert_eq!(cli.forced_log_level(), None);
    }

    #[test]
    fn test_hash_password_command() {
        let cli = Cli::parse_from(["agentgate", "hash-password", "hunter2"]);
        let Some(Commands::HashPassword(args)) = cli.command else {
            panic!("Expected HashPassword command");
        };
        assert_eq!(args.password.as_deref(), Some("hunter2"));
        assert!(Cli::try_parse_from(["agentgate", "hash-password"]).is_err());
    }

    #[test]
    fn test_check_command() {
        let cli = Cli::parse_from(["agentgate", "check", "manage_users", "--user", "developer"]);
        let Some(Commands::Check(args)) = cli.command else {
            panic!("Expected Check command");
        };
        assert_eq!(args.permission, "manage_users");
        assert_eq!(args.user.as_deref(), Some("developer"));

        assert!(Cli::try_parse_from(["agentgate", "check", "manage_users"]).is_err());
        assert!(Cli::try_parse_from([
            "agentgate", "check", "manage_users", "--user", "a", "--token", "t"
        ])
        .is_err());
    }

    #[test]
    fn test_issue_token_command() {
        let cli = Cli::parse_from(["agentgate", "issue-token", "admin", "--ttl-secs", "60"]);
        let Some(Commands::IssueToken(args)) = cli.command else {
            panic!("Expected IssueToken command");
        };
        assert_eq!(args.username, "admin");
        assert_eq!(args.ttl_secs, Some(60));
    }
}
