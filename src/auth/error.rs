// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.
//!
//! Every variant keeps its precise kind for logging, but clients only ever see
//! one of three coarse outcomes: `unauthenticated`, `permission_denied` or
//! `internal_error`. A caller cannot tell an unknown user from a wrong
//! password, or a forged token from a missing access rule.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown user, wrong password or unusable stored hash
    CredentialsInvalid,
    /// Access token failed verification
    InvalidAccessToken,
    /// Refresh token failed verification
    InvalidRefreshToken,
    /// No access rule exists for the endpoint
    RuleNotFound,
    /// The endpoint's access rule lists no roles
    EmptyRuleSet,
    /// Access rule lookup failed for another reason
    RuleLookupFailed(String),
    /// Role is valid but not permitted on the endpoint
    AccessDenied,
    /// No authorization header present
    MissingAuthHeader,
    /// Invalid authorization header format
    InvalidAuthHeader,
    /// Internal error outside the login and refresh flows (e.g. seed hashing)
    Internal(String),
}

/// Coarse outcome reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    Unauthenticated,
    PermissionDenied,
    Internal,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// The coarse category this error is reported as.
    pub fn failure(&self) -> AuthFailure {
        match self {
            AuthError::CredentialsInvalid
            | AuthError::InvalidRefreshToken
            | AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader => AuthFailure::Unauthenticated,
            AuthError::InvalidAccessToken
            | AuthError::RuleNotFound
            | AuthError::EmptyRuleSet
            | AuthError::RuleLookupFailed(_)
            | AuthError::AccessDenied => AuthFailure::PermissionDenied,
            AuthError::Internal(_) => AuthFailure::Internal,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self.failure() {
            AuthFailure::Unauthenticated => "unauthenticated",
            AuthFailure::PermissionDenied => "permission_denied",
            AuthFailure::Internal => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self.failure() {
            AuthFailure::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthFailure::PermissionDenied => StatusCode::FORBIDDEN,
            AuthFailure::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to clients.
    pub fn public_message(&self) -> &'static str {
        match self.failure() {
            AuthFailure::Unauthenticated => "Authentication failed",
            AuthFailure::PermissionDenied => "Access denied",
            AuthFailure::Internal => "Internal error",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::CredentialsInvalid => write!(f, "Invalid credentials"),
            AuthError::InvalidAccessToken => write!(f, "Access token is invalid"),
            AuthError::InvalidRefreshToken => write!(f, "Refresh token is invalid"),
            AuthError::RuleNotFound => write!(f, "No access rule for endpoint"),
            AuthError::EmptyRuleSet => write!(f, "Access rule has no roles"),
            AuthError::RuleLookupFailed(msg) => write!(f, "Access rule lookup failed: {msg}"),
            AuthError::AccessDenied => write!(f, "Role is not permitted on endpoint"),
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::Internal(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!(reason = %self, code = self.error_code(), "request rejected");
        let body = Json(AuthErrorBody {
            error: self.public_message().to_string(),
            error_code: self.error_code().to_string(),
        });
        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: AuthError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn credential_failures_are_indistinguishable() {
        let (status, body) = body_of(AuthError::CredentialsInvalid).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "unauthenticated");
        assert_eq!(body["error"], "Authentication failed");

        let (status2, body2) = body_of(AuthError::InvalidRefreshToken).await;
        assert_eq!(status, status2);
        assert_eq!(body, body2);
    }

    #[tokio::test]
    async fn denial_kinds_share_one_response() {
        let expected = body_of(AuthError::AccessDenied).await;
        assert_eq!(expected.0, StatusCode::FORBIDDEN);

        for err in [
            AuthError::InvalidAccessToken,
            AuthError::RuleNotFound,
            AuthError::EmptyRuleSet,
            AuthError::RuleLookupFailed("db down".to_string()),
        ] {
            assert_eq!(body_of(err).await, expected);
        }
    }

    #[tokio::test]
    async fn internal_detail_is_not_exposed() {
        let (status, body) = body_of(AuthError::Internal("hmac key rejected".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("hmac"));
    }

    #[test]
    fn missing_header_is_unauthenticated() {
        assert_eq!(
            AuthError::MissingAuthHeader.failure(),
            AuthFailure::Unauthenticated
        );
        assert_eq!(AuthError::InvalidAuthHeader.status_code(), StatusCode::UNAUTHORIZED);
    }
}
