// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # agentgate-bin
//!
//! Command-line entry point for agentgate.
//!
//! ```text
//!   main.rs ──► cli.rs ──► commands::execute
//!                 │              │
//!                 ▼              ├── serve ──► agentgate-api + shutdown
//!             logging.rs         ├── validate / issue-token / check ──► agentgate-config
//!                                └── hash-password ──► agentgate-core
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the server (default command)
//! agentgate -c /etc/agentgate/agentgate.yaml
//!
//! # Produce a password hash for the users table
//! agentgate hash-password 'correct horse battery staple'
//!
//! # Mint a token and check it
//! TOKEN=$(agentgate issue-token developer)
//! agentgate check create_agent --token "$TOKEN"
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod shutdown;

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;

use cli::LogFormat;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolves the log level and format.
///
/// Flags win; otherwise the `logging` section of the configuration file is
/// used when it loads, and `info`/text when it does not.
pub fn logging_settings(cli: &Cli) -> (String, LogFormat) {
    let file = match (cli.forced_log_level(), cli.log_format) {
        (Some(_), Some(_)) => None,
        _ => agentgate_config::load_config(&cli.config).ok().map(|c| c.logging),
    };

    let level = cli
        .forced_log_level()
        .map(str::to_string)
        .or_else(|| file.as_ref().map(|l| l.level.as_str().to_string()))
        .unwrap_or_else(|| "info".to_string());

    let format = cli
        .log_format
        .or_else(|| file.map(|l| LogFormat::from(l.format)))
        .unwrap_or_default();

    (level, format)
}
