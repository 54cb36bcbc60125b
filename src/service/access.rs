// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Endpoint access decisions.
//!
//! A caller may invoke an endpoint only if its verified access token carries
//! a role listed in the endpoint's access rule. Missing rules and rules
//! without roles deny; there is no implicit allow.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::auth::{AuthError, IdentityClaims, KeyPurpose, TokenCodec};
use crate::repository::{AccessRuleLookup, RepositoryError};

pub struct AccessService {
    rules: Arc<dyn AccessRuleLookup>,
    codec: Arc<TokenCodec>,
}

impl AccessService {
    pub fn new(rules: Arc<dyn AccessRuleLookup>, codec: Arc<TokenCodec>) -> Self {
        Self { rules, codec }
    }

    /// Decide whether the bearer of `access_token` may call `endpoint`.
    ///
    /// `Ok(false)` is a well-formed "no": the token is valid and a rule
    /// exists, but the token's role is not in it.
    pub async fn check(&self, access_token: &str, endpoint: &str) -> Result<bool, AuthError> {
        self.decide(access_token, endpoint)
            .await
            .map(|(allowed, _)| allowed)
    }

    /// Like [`check`](Self::check), but returns the verified claims on success
    /// and turns a negative decision into [`AuthError::AccessDenied`].
    pub async fn authorize(
        &self,
        access_token: &str,
        endpoint: &str,
    ) -> Result<IdentityClaims, AuthError> {
        match self.decide(access_token, endpoint).await? {
            (true, claims) => Ok(claims),
            (false, claims) => {
                debug!(user = %claims.subject_name, role = %claims.role, endpoint, "access denied");
                Err(AuthError::AccessDenied)
            }
        }
    }

    async fn decide(
        &self,
        access_token: &str,
        endpoint: &str,
    ) -> Result<(bool, IdentityClaims), AuthError> {
        let claims = self
            .codec
            .verify(access_token, KeyPurpose::Access)
            .map_err(|e| {
                debug!(reason = %e, endpoint, "access token rejected");
                AuthError::InvalidAccessToken
            })?;

        let rule = match self.rules.get_access_rule_by_endpoint(endpoint).await {
            Ok(rule) => rule,
            Err(RepositoryError::NotFound(_)) => {
                debug!(endpoint, "no access rule for endpoint");
                return Err(AuthError::RuleNotFound);
            }
            Err(RepositoryError::Unavailable(msg)) => {
                warn!(endpoint, error = %msg, "access rule lookup failed");
                return Err(AuthError::RuleLookupFailed(msg));
            }
        };

        if rule.roles.is_empty() {
            warn!(endpoint, "access rule has no roles");
            return Err(AuthError::EmptyRuleSet);
        }

        Ok((rule.permits(&claims.role), claims))
    }
}
