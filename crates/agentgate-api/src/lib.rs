// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # agentgate-api
//!
//! HTTP surface for agentgate.
//!
//! ## Endpoints
//!
//! | Method | Path | Access |
//! |--------|------|--------|
//! | GET | `/health` | public |
//! | POST | `/api/v1/auth/login` | public |
//! | GET | `/api/v1/auth/me` | any valid token |
//! | POST | `/api/v1/auth/authorize` | decision query |
//! | POST | `/api/v1/agents/execute` | `execute_agent` |
//! | GET | `/api/v1/history` | `view_history` |
//! | POST | `/api/v1/agents` | `create_agent` |
//! | POST | `/api/v1/agents/{id}/publish` | `publish_agent` |
//! | GET | `/api/v1/admin/users` | `manage_users` |
//! | GET | `/api/v1/data/audit` | `audit_data_access` |
//!
//! Missing, malformed or expired tokens yield `401` with
//! `WWW-Authenticate: Bearer`; a valid token without the permission yields
//! `403`.
//!
//! ## Example
//!
//! ```rust,ignore
//! let state = AppState::from_config(&config)?;
//! ApiServer::new(state).run_with_shutdown(shutdown).await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use extractors::{BearerToken, OptionalBearerToken, ValidatedJson};
pub use server::ApiServer;
pub use state::AppState;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
