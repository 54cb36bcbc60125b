// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the principal they identify.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// The identity a token is issued for.
///
/// This is the input to token issuance and the part of the claims that
/// survives a refresh exchange unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    /// Username / display name
    pub name: String,
    /// Role label
    pub role: Role,
}

impl Principal {
    pub fn new(name: impl Into<String>, role: impl Into<Role>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }
}

/// Claims embedded in every signed token.
///
/// Claims are built once at issuance and never mutated; refreshing a token
/// produces a new `IdentityClaims` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Username of the principal
    #[serde(rename = "username")]
    pub subject_name: String,

    /// Role label of the principal
    pub role: Role,

    /// Expiration timestamp (seconds since epoch)
    #[serde(rename = "exp")]
    pub expires_at: i64,

    /// Issued at timestamp
    #[serde(default)]
    pub iat: i64,

    /// Token identifier, unique per issuance
    #[serde(default)]
    pub jti: String,
}

impl IdentityClaims {
    pub fn new(principal: &Principal, issued_at: i64, expires_at: i64) -> Self {
        Self {
            subject_name: principal.name.clone(),
            role: principal.role.clone(),
            expires_at,
            iat: issued_at,
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// The identity part of the claims, without timing data.
    pub fn principal(&self) -> Principal {
        Principal {
            name: self.subject_name.clone(),
            role: self.role.clone(),
        }
    }

    /// Whether the claims are still valid at `now` (seconds since epoch).
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.expires_at > now
    }
}
