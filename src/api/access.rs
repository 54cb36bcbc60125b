// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access check endpoint.

use axum::{extract::State, Json};

use crate::{
    auth::{AuthError, BearerToken},
    error::{require_field, ApiError},
    models::{CheckRequest, CheckResponse},
    state::AppState,
};

/// Check whether the bearer may call an endpoint.
///
/// A denial, an invalid token and a missing access rule all return the same
/// 403 response.
#[utoipa::path(
    post,
    path = "/v1/access/check",
    tag = "Access",
    request_body = CheckRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Access granted", body = CheckResponse),
        (status = 400, description = "Missing endpoint address"),
        (status = 401, description = "Missing or malformed authorization header"),
        (status = 403, description = "Access denied"),
    )
)]
pub async fn check(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(request): Json<CheckRequest>,
) -> Result<Json<CheckResponse>, ApiError> {
    require_field("endpoint_address", &request.endpoint_address)?;

    if !state.access.check(&token, &request.endpoint_address).await? {
        return Err(AuthError::AccessDenied.into());
    }

    Ok(Json(CheckResponse { allowed: true }))
}
