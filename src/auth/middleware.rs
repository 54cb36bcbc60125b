// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access-control middleware for Axum.
//!
//! Gates a router subtree behind the access decision engine: the request
//! path is the endpoint identifier, and the bearer's role must be listed in
//! that endpoint's access rule. On success the verified claims are placed in
//! the request extensions for the [`CurrentUser`](super::CurrentUser)
//! extractor.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/users/me", get(me))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_access));
//! ```

use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::extractor::bearer_token;
use crate::state::AppState;

/// Authorize the request against the access rule for its path.
pub async fn require_access(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Ok(token) => token,
        Err(e) => return e.into_response(),
    };

    // Nested routers see a stripped URI; rules are keyed by the full path.
    let endpoint = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    match state.access.authorize(&token, &endpoint).await {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    use crate::auth::{CurrentUser, KeyPurpose, Principal, Role, TokenCodec};
    use crate::config::TokenConfig;
    use crate::repository::{
        EndpointAccessRule, InMemoryAccessRuleRepository, InMemoryUserRepository,
    };

    fn setup() -> (Router, Arc<TokenCodec>) {
        let codec = Arc::new(TokenCodec::new(
            TokenConfig::new("access-secret", Duration::from_secs(900)),
            TokenConfig::new("refresh-secret", Duration::from_secs(3600)),
        ));
        let rules = InMemoryAccessRuleRepository::with_rules([EndpointAccessRule::new(
            "/api/secret",
            [Role::ADMIN],
        )]);
        let state = AppState::new(
            codec.clone(),
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(rules),
        );

        let inner = Router::new()
            .route(
                "/secret",
                get(|CurrentUser(claims): CurrentUser| async move { claims.subject_name }),
            )
            .route("/unlisted", get(|| async { "reached" }))
            .route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                require_access,
            ))
            .with_state(state);

        (Router::new().nest("/api", inner), codec)
    }

    async fn call(app: Router, path: &str, token: Option<&str>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn admin_reaches_protected_route() {
        let (app, codec) = setup();
        let token = codec
            .issue(&Principal::new("bob", Role::admin()), KeyPurpose::Access)
            .unwrap();

        let (status, body) = call(app, "/api/secret", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "bob");
    }

    #[tokio::test]
    async fn wrong_role_is_forbidden() {
        let (app, codec) = setup();
        let token = codec
            .issue(&Principal::new("eve", Role::user()), KeyPurpose::Access)
            .unwrap();

        let (status, _) = call(app, "/api/secret", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn route_without_rule_is_forbidden() {
        let (app, codec) = setup();
        let token = codec
            .issue(&Principal::new("bob", Role::admin()), KeyPurpose::Access)
            .unwrap();

        let (status, body) = call(app, "/api/unlisted", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(!body.contains("reached"));
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let (app, _) = setup();
        let (status, _) = call(app, "/api/secret", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
