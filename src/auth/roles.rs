// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single role label carried in a token and listed in access rules.
///
/// Roles are opaque, case-sensitive labels. The service does not rank them:
/// an endpoint is reachable by a role only if its access rule lists that
/// exact label.
///
/// ## Well-known labels
///
/// - `ROLE_USER` - regular account
/// - `ROLE_ADMIN` - administrative account
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub const USER: &'static str = "ROLE_USER";
    pub const ADMIN: &'static str = "ROLE_ADMIN";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn user() -> Self {
        Self::new(Self::USER)
    }

    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Default for Role {
    /// Least privilege for a freshly created account.
    fn default() -> Self {
        Role::user()
    }
}

impl From<&str> for Role {
    fn from(label: &str) -> Self {
        Role::new(label)
    }
}

impl From<String> for Role {
    fn from(label: String) -> Self {
        Role(label)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
