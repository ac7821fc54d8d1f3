// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.

mod check;
mod hash_password;
mod issue_token;
mod serve;
mod validate;
mod version;

pub use check::check;
pub use hash_password::hash_password;
pub use issue_token::issue_token;
pub use serve::serve;
pub use validate::validate;
pub use version::version;

use agentgate_config::GateConfig;

use crate::cli::{Cli, Commands};
use crate::error::BinResult;

/// Executes the command selected on the command line.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Serve(args) => serve::serve(&cli, args).await,
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::HashPassword(args) => hash_password::hash_password(&cli, args),
        Commands::IssueToken(args) => issue_token::issue_token(&cli, args),
        Commands::Check(args) => check::check(&cli, args),
        Commands::Version => version::version(&cli),
    }
}

/// Loads and validates the configuration named on the command line.
pub fn load_config(cli: &Cli) -> BinResult<GateConfig> {
    Ok(agentgate_config::load_config(&cli.config)?)
}
