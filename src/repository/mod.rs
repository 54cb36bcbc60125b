// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Repositories
//!
//! The authentication core reads two kinds of records it does not own:
//!
//! - user records, looked up by username during login
//! - endpoint access rules, looked up by endpoint during access checks
//!
//! Both are reached through the [`UserLookup`] and [`AccessRuleLookup`]
//! traits so the services can run against a database, a cache or the
//! in-memory stores in [`memory`].

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::auth::Role;

pub mod cache;
pub mod memory;

pub use cache::CachedUserLookup;
pub use memory::{InMemoryAccessRuleRepository, InMemoryUserRepository, SeedData};

/// Error type for repository lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Stored user record.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    /// bcrypt hash of the user's password
    pub password_hash: String,
    pub role: Role,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("name", &self.name)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Roles permitted to call one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EndpointAccessRule {
    /// Endpoint identifier, e.g. `/user_v1.UserV1/Delete` or `/v1/users/me`
    pub endpoint: String,
    /// Permitted role labels
    #[schema(value_type = Vec<String>)]
    pub roles: BTreeSet<Role>,
}

impl EndpointAccessRule {
    pub fn new<I, R>(endpoint: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        Self {
            endpoint: endpoint.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn permits(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }
}

/// Look up users by name.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn get_user_by_name(&self, name: &str) -> RepositoryResult<UserRecord>;
}

/// Look up the access rule for an endpoint.
#[async_trait]
pub trait AccessRuleLookup: Send + Sync {
    async fn get_access_rule_by_endpoint(&self, endpoint: &str)
        -> RepositoryResult<EndpointAccessRule>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_permits_listed_roles_only() {
        let rule = EndpointAccessRule::new("/svc/Method", [Role::ADMIN]);
        assert!(rule.permits(&Role::admin()));
        assert!(!rule.permits(&Role::user()));
    }

    #[test]
    fn rule_deduplicates_roles() {
        let rule = EndpointAccessRule::new("/svc/Method", ["ROLE_USER", "ROLE_USER", "ROLE_ADMIN"]);
        assert_eq!(rule.roles.len(), 2);
    }

    #[test]
    fn user_record_debug_hides_hash() {
        let user = UserRecord {
            name: "alice".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            role: Role::user(),
        };
        assert!(!format!("{user:?}").contains("secret"));
    }
}
