// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory user and access rule stores.
//!
//! These back the service when no external database is wired in and are the
//! fakes used throughout the test suite. Both can be filled from a JSON seed
//! file:
//!
//! ```json
//! {
//!   "users": [
//!     { "name": "alice", "role": "ROLE_ADMIN", "password": "s3cret" },
//!     { "name": "bob", "role": "ROLE_USER", "password_hash": "$2b$12$..." }
//!   ],
//!   "access_rules": [
//!     { "endpoint": "/v1/users/me", "roles": ["ROLE_USER", "ROLE_ADMIN"] }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;

use super::{
    AccessRuleLookup, EndpointAccessRule, RepositoryError, RepositoryResult, UserLookup,
    UserRecord,
};
use crate::auth::{password, AuthError, Role};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse seed file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("user {0} needs either password or password_hash")]
    MissingPassword(String),
    #[error("seed user {name:?} is invalid: {reason}")]
    InvalidUser { name: String, reason: &'static str },
    #[error("failed to hash password for {name}: {source}")]
    Hash { name: String, source: AuthError },
}

/// A user entry in the seed file.
#[derive(Deserialize)]
pub struct SeedUser {
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_hash: Option<String>,
}

/// Contents of a seed file.
#[derive(Deserialize, Default)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub access_rules: Vec<EndpointAccessRule>,
}

impl SeedData {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Resolve seed users into stored records, hashing plaintext passwords.
    pub fn user_records(&self, cost: u32) -> Result<Vec<UserRecord>, SeedError> {
        self.users
            .iter()
            .map(|user| {
                if user.name.trim().is_empty() {
                    return Err(SeedError::InvalidUser {
                        name: user.name.clone(),
                        reason: "name is blank",
                    });
                }
                if user.role.is_empty() {
                    return Err(SeedError::InvalidUser {
                        name: user.name.clone(),
                        reason: "role is blank",
                    });
                }
                let password_hash = match (&user.password_hash, &user.password) {
                    (Some(hash), _) => hash.clone(),
                    (None, Some(plain)) => {
                        password::hash_password(plain, cost).map_err(|source| SeedError::Hash {
                            name: user.name.clone(),
                            source,
                        })?
                    }
                    (None, None) => return Err(SeedError::MissingPassword(user.name.clone())),
                };
                Ok(UserRecord {
                    name: user.name.clone(),
                    password_hash,
                    role: user.role.clone(),
                })
            })
            .collect()
    }
}

/// User store keyed by username.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|u| (u.name.clone(), u)).collect()),
        }
    }

}

#[cfg(test)]
impl InMemoryUserRepository {
    pub async fn insert_user(&self, user: UserRecord) {
        self.users.write().await.insert(user.name.clone(), user);
    }

    pub async fn remove_user(&self, name: &str) -> Option<UserRecord> {
        self.users.write().await.remove(name)
    }
}

#[async_trait]
impl UserLookup for InMemoryUserRepository {
    async fn get_user_by_name(&self, name: &str) -> RepositoryResult<UserRecord> {
        self.users
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("user {name}")))
    }
}

/// Access rule store keyed by endpoint.
#[derive(Default)]
pub struct InMemoryAccessRuleRepository {
    rules: RwLock<HashMap<String, EndpointAccessRule>>,
}

impl InMemoryAccessRuleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: impl IntoIterator<Item = EndpointAccessRule>) -> Self {
        Self {
            rules: RwLock::new(rules.into_iter().map(|r| (r.endpoint.clone(), r)).collect()),
        }
    }
}

#[async_trait]
impl AccessRuleLookup for InMemoryAccessRuleRepository {
    async fn get_access_rule_by_endpoint(
        &self,
        endpoint: &str,
    ) -> RepositoryResult<EndpointAccessRule> {
        self.rules
            .read()
            .await
            .get(endpoint)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("access rule {endpoint}")))
    }
}
