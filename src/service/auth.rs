// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and token refresh flows.
//!
//! ## Flow
//!
//! 1. `login` checks a username/password pair and returns a refresh token
//! 2. `get_access_token` trades a refresh token for a short-lived access token
//! 3. `get_refresh_token` rotates a refresh token before it expires
//!
//! Refresh is stateless: the refresh token itself carries the principal, so
//! neither exchange touches the user store. There is no revocation list; an
//! old refresh token stays usable until its own expiry.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::auth::password::check_password_hash;
use crate::auth::{AuthError, KeyPurpose, Principal, TokenCodec};
use crate::repository::{RepositoryError, UserLookup};

/// Refresh and access token issued together by a login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionTokens {
    pub refresh_token: String,
    pub access_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

pub struct AuthService {
    users: Arc<dyn UserLookup>,
    codec: Arc<TokenCodec>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserLookup>, codec: Arc<TokenCodec>) -> Self {
        Self { users, codec }
    }

    /// Authenticate `username`/`password` and issue a refresh token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let principal = self.authenticate(username, password).await?;
        let token = issue(
            &self.codec,
            &principal,
            KeyPurpose::Refresh,
            AuthError::CredentialsInvalid,
        )?;
        debug!(user = %principal.name, "login succeeded");
        Ok(token)
    }

    /// Authenticate and issue both a refresh and an access token.
    pub async fn login_with_access(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SessionTokens, AuthError> {
        let principal = self.authenticate(username, password).await?;
        let refresh_token = issue(
            &self.codec,
            &principal,
            KeyPurpose::Refresh,
            AuthError::CredentialsInvalid,
        )?;
        let access_token = issue(
            &self.codec,
            &principal,
            KeyPurpose::Access,
            AuthError::CredentialsInvalid,
        )?;
        debug!(user = %principal.name, "login succeeded");

        Ok(SessionTokens {
            refresh_token,
            access_token,
            expires_in: self.codec.expires_in(KeyPurpose::Access),
        })
    }

    /// Exchange a valid refresh token for a new one carrying the same principal.
    pub fn get_refresh_token(&self, old_refresh_token: &str) -> Result<String, AuthError> {
        let principal = self.verify_refresh(old_refresh_token)?;
        issue(
            &self.codec,
            &principal,
            KeyPurpose::Refresh,
            AuthError::InvalidRefreshToken,
        )
    }

    /// Exchange a valid refresh token for an access token.
    pub fn get_access_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        let principal = self.verify_refresh(refresh_token)?;
        issue(
            &self.codec,
            &principal,
            KeyPurpose::Access,
            AuthError::InvalidRefreshToken,
        )
    }

    fn verify_refresh(&self, token: &str) -> Result<Principal, AuthError> {
        self.codec
            .verify(token, KeyPurpose::Refresh)
            .map(|claims| claims.principal())
            .map_err(|e| {
                debug!(reason = %e, "refresh token rejected");
                AuthError::InvalidRefreshToken
            })
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<Principal, AuthError> {
        let user = match self.users.get_user_by_name(username).await {
            Ok(user) => user,
            Err(RepositoryError::NotFound(_)) => {
                debug!(user = username, "login for unknown user");
                return Err(AuthError::CredentialsInvalid);
            }
            Err(e) => {
                warn!(user = username, error = %e, "user lookup failed during login");
                return Err(AuthError::CredentialsInvalid);
            }
        };

        // bcrypt blocks; run it off the async workers.
        let plain = password.to_owned();
        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || check_password_hash(&plain, &hash))
            .await
            .map_err(|e| {
                warn!(user = username, error = %e, "password check task failed during login");
                AuthError::CredentialsInvalid
            })?;

        if !matches {
            debug!(user = username, "login with wrong password");
            return Err(AuthError::CredentialsInvalid);
        }

        Ok(Principal {
            name: user.name,
            role: user.role,
        })
    }
}

/// Sign a token for `principal`. Any failure is logged and reported to the
/// caller as `rejected`, so clients only ever see an authentication failure.
fn issue(
    codec: &TokenCodec,
    principal: &Principal,
    purpose: KeyPurpose,
    rejected: AuthError,
) -> Result<String, AuthError> {
    codec.issue(principal, purpose).map_err(|e| {
        warn!(user = %principal.name, %purpose, error = %e, "token issuance failed");
        rejected
    })
}
