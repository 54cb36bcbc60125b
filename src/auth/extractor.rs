// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for bearer tokens and authorized callers.
//!
//! ```rust,ignore
//! async fn check(BearerToken(token): BearerToken) -> impl IntoResponse {
//!     // token is the raw access token string
//! }
//!
//! async fn me(CurrentUser(claims): CurrentUser) -> impl IntoResponse {
//!     // claims were verified by the `require_access` middleware
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{AuthError, IdentityClaims};

const BEARER_PREFIX: &str = "Bearer ";

/// Raw token taken from `Authorization: Bearer <token>`.
///
/// The token is not verified by the extractor.
pub struct BearerToken(pub String);

/// Parse the bearer token out of request headers.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .ok_or(AuthError::InvalidAuthHeader)?;

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok(token.to_string())
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_token(&parts.headers).map(BearerToken)
    }
}

/// Claims of a caller already authorized by the `require_access` middleware.
///
/// Rejects with `AccessDenied` if the route is not behind the middleware, so
/// a missing layer never lets a request through.
pub struct CurrentUser(pub IdentityClaims);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AuthError::AccessDenied)
    }
}
