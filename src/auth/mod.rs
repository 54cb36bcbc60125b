// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Self-contained JWT sessions and role-based endpoint access.
//!
//! ## Auth Flow
//!
//! 1. Client logs in with username/password and receives a refresh token
//! 2. Client exchanges the refresh token for a short-lived access token
//! 3. Client sends `Authorization: Bearer <access token>` on every call
//! 4. Server:
//!    - Verifies the HMAC signature and expiry of the access token
//!    - Looks up the access rule for the called endpoint
//!    - Allows the call only if the token's role is listed in the rule
//!
//! ## Security
//!
//! - Access and refresh tokens are signed with separate secrets
//! - Only HMAC algorithms are accepted; `none` and asymmetric headers are rejected
//! - Missing access rules deny (fail closed)
//! - Clients only see coarse failure categories

pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod roles;

pub use claims::{IdentityClaims, Principal};
pub use codec::{Clock, InvalidReason, KeyPurpose, SystemClock, TokenCodec, TokenError};
#[cfg(test)]
pub use codec::ManualClock;
pub use error::{AuthError, AuthFailure};
pub use extractor::{BearerToken, CurrentUser};
pub use roles::Role;
