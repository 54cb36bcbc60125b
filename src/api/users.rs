// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;

use crate::auth::{CurrentUser, IdentityClaims};
use crate::models::UserMeResponse;

impl From<IdentityClaims> for UserMeResponse {
    fn from(claims: IdentityClaims) -> Self {
        Self {
            name: claims.subject_name,
            role: claims.role,
            expires_at: claims.expires_at,
        }
    }
}

/// Get the identity behind the presented access token.
///
/// Gated by the access middleware: the caller's role must be listed in the
/// access rule for `/v1/users/me`.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Missing or malformed authorization header"),
        (status = 403, description = "Access denied"),
    )
)]
pub async fn get_current_user(CurrentUser(claims): CurrentUser) -> Json<UserMeResponse> {
    Json(claims.into())
}
