// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # agentgate Integration Tests
//!
//! Shared fixtures and mocks for the suites under `tests/`.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p agentgate-tests
//! cargo test -p agentgate-tests --test integration_auth
//! cargo test -p agentgate-tests --test integration_config
//! cargo test -p agentgate-tests --test integration_api
//! ```
//!
//! ## Suites
//!
//! - `integration_auth.rs`: permission resolution, tokens, passwords,
//!   authorization decisions
//! - `integration_config.rs`: file formats, placeholders, environment
//!   overrides, validation
//! - `integration_api.rs`: HTTP status codes, headers and bodies

pub mod common;
