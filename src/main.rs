// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use auth_service::{
    api::router,
    auth::{password::BCRYPT_COST, TokenCodec},
    config::{AppConfig, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV},
    repository::{
        CachedUserLookup, InMemoryAccessRuleRepository, InMemoryUserRepository, SeedData,
    },
    state::AppState,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AppConfig::from_env()?;
    info!(
        access_ttl_secs = config.access_token.expiration().as_secs(),
        refresh_ttl_secs = config.refresh_token.expiration().as_secs(),
        "token configuration loaded"
    );

    let seed = match &config.seed_file {
        Some(path) => {
            let seed = SeedData::from_file(path)?;
            info!(
                path = %path.display(),
                users = seed.users.len(),
                rules = seed.access_rules.len(),
                "loaded seed data"
            );
            seed
        }
        None => {
            warn!("no seed file configured; every access check will be denied");
            SeedData::default()
        }
    };

    let users = Arc::new(InMemoryUserRepository::with_users(
        seed.user_records(BCRYPT_COST)?,
    ));
    let rules = Arc::new(InMemoryAccessRuleRepository::with_rules(seed.access_rules));
    let cached_users = Arc::new(CachedUserLookup::new(
        users,
        config.user_cache_capacity,
        config.user_cache_ttl,
    ));

    let codec = Arc::new(TokenCodec::new(
        config.access_token.clone(),
        config.refresh_token.clone(),
    ));
    let app = router(AppState::new(codec, cached_users, rules));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "auth service listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
