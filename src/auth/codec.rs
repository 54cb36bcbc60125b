// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token codec: signs identity claims into JWTs and verifies them back.
//!
//! Access and refresh tokens are both HMAC-signed JWTs. They differ only in
//! the secret and lifetime they are configured with, so a token minted for
//! one purpose never verifies under the other.
//!
//! ## Verification
//!
//! 1. The header must name an HMAC algorithm (`HS256`, `HS384`, `HS512`).
//!    Anything else, including `none`, is rejected before the signature is
//!    looked at.
//! 2. The MAC is recomputed with the secret for the requested purpose.
//! 3. `exp` must be strictly greater than the clock's current time. There is
//!    no leeway.

#[cfg(test)]
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};
use thiserror::Error;

use super::claims::{IdentityClaims, Principal};
use crate::config::TokenConfig;

/// Algorithm used when issuing tokens.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Algorithms accepted when verifying tokens.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Which configured secret and lifetime a token operation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPurpose {
    Access,
    Refresh,
}

impl std::fmt::Display for KeyPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyPurpose::Access => write!(f, "access"),
            KeyPurpose::Refresh => write!(f, "refresh"),
        }
    }
}

/// Why a token failed verification. Only ever logged, never returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    Malformed,
    Algorithm,
    Signature,
    Expired,
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidReason::Malformed => write!(f, "malformed token"),
            InvalidReason::Algorithm => write!(f, "unexpected signing algorithm"),
            InvalidReason::Signature => write!(f, "signature mismatch"),
            InvalidReason::Expired => write!(f, "token expired"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(InvalidReason),
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Source of the current time, in seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Manually driven clock for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualClock(AtomicI64);

#[cfg(test)]
impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self(AtomicI64::new(now))
    }

    pub fn set(&self, now: i64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Issues and verifies access and refresh tokens.
///
/// The codec holds no mutable state; share it behind an `Arc`.
pub struct TokenCodec {
    access: TokenConfig,
    refresh: TokenConfig,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec driven by the wall clock.
    pub fn new(access: TokenConfig, refresh: TokenConfig) -> Self {
        Self::with_clock(access, refresh, Arc::new(SystemClock))
    }

    pub fn with_clock(access: TokenConfig, refresh: TokenConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            access,
            refresh,
            clock,
        }
    }

    fn config(&self, purpose: KeyPurpose) -> &TokenConfig {
        match purpose {
            KeyPurpose::Access => &self.access,
            KeyPurpose::Refresh => &self.refresh,
        }
    }

    /// Lifetime of tokens issued for `purpose`, in seconds.
    ///
    /// Saturates at `i64::MAX`; `issue` refuses lifetimes that overflow `exp`.
    pub fn expires_in(&self, purpose: KeyPurpose) -> i64 {
        i64::try_from(self.config(purpose).expiration().as_secs()).unwrap_or(i64::MAX)
    }

    /// Sign a fresh token for `principal`.
    ///
    /// The principal is not validated here; callers are expected to pass a
    /// name and role they already trust.
    pub fn issue(&self, principal: &Principal, purpose: KeyPurpose) -> Result<String, TokenError> {
        let now = self.clock.now();
        let expires_at = now.checked_add(self.expires_in(purpose)).ok_or_else(|| {
            TokenError::Signing(format!("{purpose} token lifetime overflows the expiry timestamp"))
        })?;
        let claims = IdentityClaims::new(principal, now, expires_at);

        encode(
            &Header::new(SIGNING_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(self.config(purpose).secret()),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify `token` against the secret for `purpose` and return its claims.
    pub fn verify(&self, token: &str, purpose: KeyPurpose) -> Result<IdentityClaims, TokenError> {
        let header = decode_header(token).map_err(|_| TokenError::Invalid(InvalidReason::Malformed))?;
        if !ACCEPTED_ALGORITHMS.contains(&header.alg) {
            return Err(TokenError::Invalid(InvalidReason::Algorithm));
        }

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = 0;
        // Expiry is checked below against the injected clock.
        validation.validate_exp = false;
        validation.validate_aud = false;

        let token_data = decode::<IdentityClaims>(
            token,
            &DecodingKey::from_secret(self.config(purpose).secret()),
            &validation,
        )
        .map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::InvalidSignature => InvalidReason::Signature,
                ErrorKind::InvalidAlgorithm => InvalidReason::Algorithm,
                _ => InvalidReason::Malformed,
            };
            TokenError::Invalid(reason)
        })?;

        let claims = token_data.claims;
        if !claims.is_valid_at(self.clock.now()) {
            return Err(TokenError::Invalid(InvalidReason::Expired));
        }

        Ok(claims)
    }
}
