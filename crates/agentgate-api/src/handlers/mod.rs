// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers for all endpoints.
//!
//! - [`health`]: liveness
//! - [`auth`]: login, current user and decision queries
//! - [`agents`]: permission-guarded agent operations

mod agents;
mod auth;
mod health;

pub use agents::*;
pub use auth::*;
pub use health::*;
