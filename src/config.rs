// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! immutable [`AppConfig`] built from them at startup. Nothing here is global:
//! `main` loads the config once and hands the pieces to the constructors that
//! need them.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `ACCESS_TOKEN_SECRET_KEY` | HMAC secret for access tokens | Required |
//! | `ACCESS_TOKEN_EXPIRATION_TIME` | Access token lifetime (minutes) | Required |
//! | `REFRESH_TOKEN_SECRET_KEY` | HMAC secret for refresh tokens | Required |
//! | `REFRESH_TOKEN_EXPIRATION_TIME` | Refresh token lifetime (minutes) | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `SEED_FILE` | JSON file with users and access rules | Optional |
//! | `USER_CACHE_CAPACITY` | Max cached user records | `1024` |
//! | `USER_CACHE_TTL_SECS` | User cache entry lifetime | `60` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const ACCESS_TOKEN_SECRET_ENV: &str = "ACCESS_TOKEN_SECRET_KEY";
pub const ACCESS_TOKEN_EXPIRATION_ENV: &str = "ACCESS_TOKEN_EXPIRATION_TIME";
pub const REFRESH_TOKEN_SECRET_ENV: &str = "REFRESH_TOKEN_SECRET_KEY";
pub const REFRESH_TOKEN_EXPIRATION_ENV: &str = "REFRESH_TOKEN_EXPIRATION_TIME";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const SEED_FILE_ENV: &str = "SEED_FILE";
pub const USER_CACHE_CAPACITY_ENV: &str = "USER_CACHE_CAPACITY";
pub const USER_CACHE_TTL_ENV: &str = "USER_CACHE_TTL_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_USER_CACHE_CAPACITY: usize = 1024;
pub const DEFAULT_USER_CACHE_TTL_SECS: u64 = 60;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Upper bound for either token lifetime: ten years, in minutes.
pub const MAX_TOKEN_EXPIRATION_MINUTES: u64 = 10 * 366 * 24 * 60;

/// Errors raised while reading configuration at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("access and refresh token secrets must differ")]
    SharedSecret,
}

/// Secret and lifetime for one token purpose.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    expiration: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<Vec<u8>>, expiration: Duration) -> Self {
        Self {
            secret: secret.into(),
            expiration,
        }
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub fn expiration(&self) -> Duration {
        self.expiration
    }
}

// Keep secrets out of logs and panic messages.
impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Complete process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub access_token: TokenConfig,
    pub refresh_token: TokenConfig,
    pub host: String,
    pub port: u16,
    pub seed_file: Option<PathBuf>,
    pub user_cache_capacity: usize,
    pub user_cache_ttl: Duration,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token =
            token_config(&lookup, ACCESS_TOKEN_SECRET_ENV, ACCESS_TOKEN_EXPIRATION_ENV)?;
        let refresh_token =
            token_config(&lookup, REFRESH_TOKEN_SECRET_ENV, REFRESH_TOKEN_EXPIRATION_ENV)?;

        if access_token.secret() == refresh_token.secret() {
            return Err(ConfigError::SharedSecret);
        }

        let host = non_empty(&lookup, HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, PORT_ENV, DEFAULT_PORT)?;
        let seed_file = non_empty(&lookup, SEED_FILE_ENV).map(PathBuf::from);
        let user_cache_capacity =
            parse_or(&lookup, USER_CACHE_CAPACITY_ENV, DEFAULT_USER_CACHE_CAPACITY)?;
        let user_cache_ttl =
            Duration::from_secs(parse_or(&lookup, USER_CACHE_TTL_ENV, DEFAULT_USER_CACHE_TTL_SECS)?);

        Ok(Self {
            access_token,
            refresh_token,
            host,
            port,
            seed_file,
            user_cache_capacity,
            user_cache_ttl,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|value| !value.trim().is_empty())
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(lookup, name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn token_config<F>(
    lookup: &F,
    secret_name: &'static str,
    expiration_name: &'static str,
) -> Result<TokenConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let minutes_raw = non_empty(lookup, expiration_name).ok_or(ConfigError::Missing(expiration_name))?;
    let minutes: u64 = minutes_raw
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
            name: expiration_name,
            reason: e.to_string(),
        })?;
    if minutes == 0 {
        return Err(ConfigError::Invalid {
            name: expiration_name,
            reason: "must be at least one minute".to_string(),
        });
    }
    if minutes > MAX_TOKEN_EXPIRATION_MINUTES {
        return Err(ConfigError::Invalid {
            name: expiration_name,
            reason: format!("must not exceed {MAX_TOKEN_EXPIRATION_MINUTES} minutes"),
        });
    }
    let seconds = minutes * 60;

    let secret = non_empty(lookup, secret_name).ok_or(ConfigError::Missing(secret_name))?;

    Ok(TokenConfig::new(secret.into_bytes(), Duration::from_secs(seconds)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base() -> HashMap<String, String> {
        vars(&[
            (ACCESS_TOKEN_SECRET_ENV, "access-secret"),
            (ACCESS_TOKEN_EXPIRATION_ENV, "15"),
            (REFRESH_TOKEN_SECRET_ENV, "refresh-secret"),
            (REFRESH_TOKEN_EXPIRATION_ENV, "1440"),
        ])
    }

    fn load(map: &HashMap<String, String>) -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn loads_token_settings_in_minutes() {
        let config = load(&base()).unwrap();
        assert_eq!(config.access_token.secret(), b"access-secret");
        assert_eq!(config.access_token.expiration(), Duration::from_secs(15 * 60));
        assert_eq!(config.refresh_token.expiration(), Duration::from_secs(1440 * 60));
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(config.seed_file.is_none());
    }

    #[test]
    fn missing_secret_is_reported() {
        let mut map = base();
        map.remove(REFRESH_TOKEN_SECRET_ENV);
        assert_eq!(
            load(&map).unwrap_err(),
            ConfigError::Missing(REFRESH_TOKEN_SECRET_ENV)
        );
    }

    #[test]
    fn non_numeric_expiration_is_rejected() {
        let mut map = base();
        map.insert(ACCESS_TOKEN_EXPIRATION_ENV.to_string(), "soon".to_string());
        assert!(matches!(
            load(&map),
            Err(ConfigError::Invalid { name: ACCESS_TOKEN_EXPIRATION_ENV, .. })
        ));
    }

    #[test]
    fn zero_expiration_is_rejected() {
        let mut map = base();
        map.insert(REFRESH_TOKEN_EXPIRATION_ENV.to_string(), "0".to_string());
        assert!(matches!(load(&map), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn oversized_expiration_is_rejected() {
        for minutes in ["200000000000000000", "400000000000000000", "18446744073709551615"] {
            let mut map = base();
            map.insert(ACCESS_TOKEN_EXPIRATION_ENV.to_string(), minutes.to_string());
            assert!(matches!(
                load(&map),
                Err(ConfigError::Invalid { name: ACCESS_TOKEN_EXPIRATION_ENV, .. })
            ));
        }
    }

    #[test]
    fn longest_allowed_expiration_loads() {
        let mut map = base();
        map.insert(
            REFRESH_TOKEN_EXPIRATION_ENV.to_string(),
            MAX_TOKEN_EXPIRATION_MINUTES.to_string(),
        );
        let config = load(&map).unwrap();
        assert_eq!(
            config.refresh_token.expiration(),
            Duration::from_secs(MAX_TOKEN_EXPIRATION_MINUTES * 60)
        );
    }

    #[test]
    fn shared_secret_is_rejected() {
        let mut map = base();
        map.insert(REFRESH_TOKEN_SECRET_ENV.to_string(), "access-secret".to_string());
        assert_eq!(load(&map).unwrap_err(), ConfigError::SharedSecret);
    }

    #[test]
    fn optional_settings_override_defaults() {
        let mut map = base();
        map.insert(PORT_ENV.to_string(), "9090".to_string());
        map.insert(SEED_FILE_ENV.to_string(), "/etc/auth/seed.json".to_string());
        map.insert(USER_CACHE_TTL_ENV.to_string(), "5".to_string());
        let config = load(&map).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.seed_file, Some(PathBuf::from("/etc/auth/seed.json")));
        assert_eq!(config.user_cache_ttl, Duration::from_secs(5));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = load(&base()).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("access-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
