// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{middleware::require_access, Role},
    models::{
        AccessTokenRequest, AccessTokenResponse, CheckRequest, CheckResponse, LoginRequest,
        LoginResponse, RefreshTokenRequest, RefreshTokenResponse, UserMeResponse,
    },
    service::SessionTokens,
    state::AppState,
};

pub mod access;
pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    // Routes behind the access rule table.
    let protected = Router::new()
        .route("/users/me", get(users::get_current_user))
        .route_layer(from_fn_with_state(state.clone(), require_access));

    let v1_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/token", post(auth::token))
        .route("/auth/refresh-token", post(auth::refresh_token))
        .route("/auth/access-token", post(auth::access_token))
        .route("/access/check", post(access::check))
        .merge(protected)
        .with_state(state);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::health))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::login,
        auth::token,
        auth::refresh_token,
        auth::access_token,
        access::check,
        users::get_current_user
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            SessionTokens,
            RefreshTokenRequest,
            RefreshTokenResponse,
            AccessTokenRequest,
            AccessTokenResponse,
            CheckRequest,
            CheckResponse,
            UserMeResponse,
            Role
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and token exchange"),
        (name = "Access", description = "Endpoint access checks"),
        (name = "Users", description = "Current user"),
        (name = "Health", description = "Liveness")
    )
)]
struct ApiDoc;
