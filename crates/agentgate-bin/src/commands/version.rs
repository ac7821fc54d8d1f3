// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::cli::Cli;
use crate::error::BinResult;

/// Prints component versions and build information.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("agentgate - role-based access control for AI agent platforms");
    println!();
    println!("Version Information:");
    println!("  agentgate-bin:    {}", crate::VERSION);
    println!("  agentgate-core:   {}", agentgate_core::VERSION);
    println!("  agentgate-config: {}", agentgate_config::VERSION);
    println!("  agentgate-api:    {}", agentgate_api::VERSION);
    println!();
    println!("Build Information:");
    println!("  Target:           {}", std::env::consts::ARCH);
    println!("  OS:               {}", std::env::consts::OS);
    println!("  Token algorithm:  {:?}", agentgate_core::token::ALGORITHM);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
