// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and token exchange endpoints.

use axum::{extract::State, Json};

use crate::{
    error::{require_field, ApiError},
    models::{
        AccessTokenRequest, AccessTokenResponse, LoginRequest, LoginResponse,
        RefreshTokenRequest, RefreshTokenResponse,
    },
    service::SessionTokens,
    state::AppState,
};

/// Log in with username and password.
///
/// Returns a refresh token; exchange it at `/v1/auth/access-token`.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Refresh token issued", body = LoginResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Authentication failed"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    require_field("username", &request.username)?;
    require_field("password", &request.password)?;

    let refresh_token = state.auth.login(&request.username, &request.password).await?;
    Ok(Json(LoginResponse { refresh_token }))
}

/// Log in and receive both a refresh and an access token.
#[utoipa::path(
    post,
    path = "/v1/auth/token",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = SessionTokens),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Authentication failed"),
    )
)]
pub async fn token(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionTokens>, ApiError> {
    require_field("username", &request.username)?;
    require_field("password", &request.password)?;

    let tokens = state
        .auth
        .login_with_access(&request.username, &request.password)
        .await?;
    Ok(Json(tokens))
}

/// Rotate a refresh token.
#[utoipa::path(
    post,
    path = "/v1/auth/refresh-token",
    tag = "Auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New refresh token", body = RefreshTokenResponse),
        (status = 400, description = "Missing refresh token"),
        (status = 401, description = "Authentication failed"),
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<RefreshTokenResponse>, ApiError> {
    require_field("refresh_token", &request.refresh_token)?;

    let refresh_token = state.auth.get_refresh_token(&request.refresh_token)?;
    Ok(Json(RefreshTokenResponse { refresh_token }))
}

/// Exchange a refresh token for an access token.
#[utoipa::path(
    post,
    path = "/v1/auth/access-token",
    tag = "Auth",
    request_body = AccessTokenRequest,
    responses(
        (status = 200, description = "Access token issued", body = AccessTokenResponse),
        (status = 400, description = "Missing refresh token"),
        (status = 401, description = "Authentication failed"),
    )
)]
pub async fn access_token(
    State(state): State<AppState>,
    Json(request): Json<AccessTokenRequest>,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    require_field("refresh_token", &request.refresh_token)?;

    let access_token = state.auth.get_access_token(&request.refresh_token)?;
    Ok(Json(AccessTokenResponse { access_token }))
}
