// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `serve` command.

use std::sync::Arc;

use agentgate_api::{ApiServer, AppState};
use agentgate_core::CredentialStore;
use tracing::info;

use crate::cli::{Cli, ServeArgs};
use crate::error::BinResult;
use crate::shutdown::shutdown_signal;

/// Starts the HTTP server and runs until a shutdown signal arrives.
pub async fn serve(cli: &Cli, args: ServeArgs) -> BinResult<()> {
    let mut config = super::load_config(cli)?;

    if let Some(bind) = args.bind {
        config.api.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }

    let service = config.auth_service()?;

    info!(
        users = service.store().len(),
        issuer = %service.tokens().issuer(),
        token_ttl_secs = service.tokens().ttl().num_seconds(),
        "Starting agentgate"
    );

    let state = AppState::new(Arc::new(service), config.api.clone());
    ApiServer::new(state)
        .run_with_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
