// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Signed access tokens.
//!
//! Tokens are compact HS256 JWTs carrying the subject, a snapshot of its
//! effective permissions, and an expiry.

mod claims;
mod manager;

pub use claims::{AccessToken, Claims, TokenClaims};
pub use manager::{
    TokenConfig, TokenManager, ALGORITHM, DEFAULT_ISSUER, DEFAULT_TTL_SECS, MAX_TTL_SECS,
    RECOMMENDED_SECRET_LEN,
};
