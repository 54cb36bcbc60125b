// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Services
//!
//! - `auth` - login and token refresh flows
//! - `access` - endpoint access decisions
//!
//! Services are stateless apart from their injected collaborators and can be
//! called concurrently without coordination. Dropping a returned future
//! cancels any in-flight repository lookup.

pub mod access;
pub mod auth;

pub use access::AccessService;
pub use auth::{AuthService, SessionTokens};
